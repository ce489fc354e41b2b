//! Legacy CodeRay layout: inline styles or classes, line numbers, tab
//! expansion and the `CodeRay` wrapper markup.

use serde_yaml::{Mapping, Value};
use std::borrow::Cow;
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;
use syntect::html::{
    ClassStyle, ClassedHTMLGenerator, IncludeBackground, styled_line_to_highlighted_html,
};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::find_syntax;
use crate::error::Result;
use crate::util::language_class;

/// Prefix of CSS classes when `css: class` is configured.
pub const CLASS_PREFIX: &str = "cr-";

/// Widest tab stop honoured; larger `tab_width` values are clamped.
const MAX_TAB_WIDTH: usize = 64;

/// How token colors are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssMode {
    /// Inline `style` attributes from the theme.
    Style,
    /// Prefixed class names, styled by an external stylesheet.
    Class,
}

/// Line number layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineNumbers {
    Inline,
    Table,
    List,
}

/// Outer wrapper markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Div,
    Span,
    Bare,
}

/// Options read from normalized `syntax_highlighter_opts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoderayOptions {
    pub css: CssMode,
    pub line_numbers: Option<LineNumbers>,
    pub line_number_start: usize,
    /// Every n-th line number is emphasized; `None` disables.
    pub bold_every: Option<usize>,
    /// Tab stop width; 0 keeps tabs.
    pub tab_width: usize,
    pub wrap: Wrap,
}

impl Default for CoderayOptions {
    fn default() -> Self {
        Self {
            css: CssMode::Style,
            line_numbers: Some(LineNumbers::Inline),
            line_number_start: 1,
            bold_every: Some(10),
            tab_width: 4,
            wrap: Wrap::Div,
        }
    }
}

impl CoderayOptions {
    /// Reads options leniently. Unrecognised values keep the defaults,
    /// `false` or null disables line numbers and emphasis.
    pub fn from_mapping(opts: &Mapping) -> Self {
        let defaults = Self::default();

        let css = match opts.get("css").and_then(symbol) {
            Some("class") => CssMode::Class,
            Some(_) | None => defaults.css,
        };

        let line_numbers = match opts.get("line_numbers") {
            None => defaults.line_numbers,
            Some(value) => match symbol(value) {
                Some("inline") => Some(LineNumbers::Inline),
                Some("table") => Some(LineNumbers::Table),
                Some("list") => Some(LineNumbers::List),
                _ => None,
            },
        };

        let bold_every = match opts.get("bold_every") {
            None => defaults.bold_every,
            Some(value) => number(value).filter(|n| *n > 0),
        };

        let wrap = match opts.get("wrap") {
            None => defaults.wrap,
            Some(value) => match symbol(value) {
                Some("div") => Wrap::Div,
                Some("span") => Wrap::Span,
                _ => Wrap::Bare,
            },
        };

        Self {
            css,
            line_numbers,
            line_number_start: opts
                .get("line_number_start")
                .and_then(number)
                .unwrap_or(defaults.line_number_start),
            bold_every,
            tab_width: opts
                .get("tab_width")
                .and_then(number)
                .unwrap_or(defaults.tab_width)
                .min(MAX_TAB_WIDTH),
            wrap,
        }
    }
}

/// Reads a string option, accepting Ruby symbol spelling (`:table`).
fn symbol(value: &Value) -> Option<&str> {
    value.as_str().map(|s| s.trim_start_matches(':'))
}

/// Reads a non-negative integer from a number or numeric string.
fn number(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// CodeRay style highlighter.
#[derive(Debug)]
pub struct CoderayHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    options: CoderayOptions,
}

impl CoderayHighlighter {
    pub fn new(syntax_set: SyntaxSet, theme: Theme, options: CoderayOptions) -> Self {
        Self {
            syntax_set,
            theme,
            options,
        }
    }

    /// Renders a code block wrapped in `highlighter-coderay` markup.
    ///
    /// # Errors
    ///
    /// Returns error if syntect fails to highlight a line.
    pub fn render(&self, code: &str, language: &str) -> Result<String> {
        let code = expand_tabs(code, self.options.tab_width);
        let html = match self.options.css {
            CssMode::Style => self.highlight_styled(&code, language)?,
            CssMode::Class => self.highlight_classed(&code, language)?,
        };
        let lines = balanced_lines(&html);

        Ok(format!(
            "<div class=\"{} highlighter-coderay\">{}</div>",
            language_class(language),
            self.layout(&lines)
        ))
    }

    fn highlight_styled(&self, code: &str, language: &str) -> Result<String> {
        let syntax = find_syntax(&self.syntax_set, language);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut html = String::with_capacity(code.len().saturating_mul(4));

        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            html.push_str(&styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }

        Ok(html)
    }

    fn highlight_classed(&self, code: &str, language: &str) -> Result<String> {
        let syntax = find_syntax(&self.syntax_set, language);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );

        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(generator.finalize())
    }

    /// Arranges highlighted lines with numbering and wrapper markup.
    fn layout(&self, lines: &[String]) -> String {
        let numbers = self.line_numbers(lines.len());
        let body = lines.join("\n");

        let inner = match self.options.line_numbers {
            Some(LineNumbers::Inline) => {
                let numbered: Vec<String> = numbers
                    .iter()
                    .zip(lines)
                    .map(|(number, line)| {
                        format!("<span class=\"line-numbers\">{}</span>{}", number, line)
                    })
                    .collect();
                Layout::Pre(numbered.join("\n"))
            }
            Some(LineNumbers::Table) => Layout::Table(format!(
                "<table class=\"CodeRay\"><tr>\n  \
                 <td class=\"line-numbers\"><pre>{}\n</pre></td>\n  \
                 <td class=\"code\"><pre>{}</pre></td>\n\
                 </tr></table>",
                numbers.join("\n"),
                body
            )),
            Some(LineNumbers::List) => {
                let items: String = lines
                    .iter()
                    .map(|line| format!("<li>{}</li>", line))
                    .collect();
                Layout::List(format!(
                    "<ol start=\"{}\">{}</ol>",
                    self.first_line_number(lines.len()),
                    items
                ))
            }
            None => Layout::Pre(body),
        };

        match self.options.wrap {
            Wrap::Div => match inner {
                Layout::Table(table) => format!("<div class=\"CodeRay\">\n  {}\n</div>", table),
                Layout::Pre(body) => format!(
                    "<div class=\"CodeRay\">\n  <div class=\"code\"><pre>{}</pre></div>\n</div>",
                    body
                ),
                Layout::List(list) => format!(
                    "<div class=\"CodeRay\">\n  <div class=\"code\">{}</div>\n</div>",
                    list
                ),
            },
            Wrap::Span => format!("<span class=\"CodeRay\">{}</span>", inner.into_markup()),
            Wrap::Bare => match inner {
                Layout::Pre(body) => format!("<pre>{}</pre>", body),
                other => other.into_markup(),
            },
        }
    }

    /// Number of the first line. A start whose numbering would pass
    /// `usize::MAX` falls back to 1.
    fn first_line_number(&self, count: usize) -> usize {
        let start = self.options.line_number_start;
        match start.checked_add(count) {
            Some(_) => start,
            None => {
                tracing::warn!(
                    line_number_start = start,
                    "Line number start out of range, numbering from 1"
                );
                1
            }
        }
    }

    /// Right aligned line numbers, emphasizing every `bold_every`-th.
    fn line_numbers(&self, count: usize) -> Vec<String> {
        let start = self.first_line_number(count);
        let last = start + count.saturating_sub(1);
        let width = last.to_string().len();

        (start..start + count)
            .map(|n| {
                let padded = format!("{:>width$}", n, width = width);
                match self.options.bold_every {
                    Some(every) if n % every == 0 => format!("<strong>{}</strong>", padded),
                    _ => padded,
                }
            })
            .collect()
    }
}

/// Block content before wrapping.
enum Layout {
    Pre(String),
    Table(String),
    List(String),
}

impl Layout {
    fn into_markup(self) -> String {
        match self {
            Layout::Pre(markup) | Layout::Table(markup) | Layout::List(markup) => markup,
        }
    }
}

/// Expands tabs to the next multiple of `width` columns.
fn expand_tabs(code: &str, width: usize) -> Cow<'_, str> {
    if width == 0 || !code.contains('\t') {
        return Cow::Borrowed(code);
    }

    let mut expanded = String::with_capacity(code.len().saturating_add(width.saturating_mul(4)));
    let mut column = 0;

    for ch in code.chars() {
        match ch {
            '\t' => {
                let pad = width - column % width;
                expanded.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                expanded.push(ch);
                column = 0;
            }
            _ => {
                expanded.push(ch);
                column += 1;
            }
        }
    }

    Cow::Owned(expanded)
}

/// Splits highlighted HTML into lines whose `<span>` tags are balanced.
///
/// Spans open across a newline are closed at the end of the line and
/// reopened on the next one. A trailing line without text is dropped.
fn balanced_lines(html: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut open: Vec<&str> = Vec::new();
    let mut current = String::new();
    let mut has_text = false;
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("</span>") {
            open.pop();
            current.push_str("</span>");
            rest = after;
        } else if rest.starts_with("<span") {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            let (tag, after) = rest.split_at(end);
            open.push(tag);
            current.push_str(tag);
            rest = after;
        } else if let Some(after) = rest.strip_prefix('\n') {
            current.extend(open.iter().map(|_| "</span>"));
            lines.push(std::mem::take(&mut current));
            current.extend(open.iter().copied());
            has_text = false;
            rest = after;
        } else {
            let end = match rest.find(['<', '\n']) {
                Some(0) => 1,
                Some(i) => i,
                None => rest.len(),
            };
            let (text, after) = rest.split_at(end);
            current.push_str(text);
            has_text = true;
            rest = after;
        }
    }

    if has_text {
        lines.push(current);
    }

    lines
}
