//! Class based highlighting in the layout Jekyll emits for Rouge.

use serde_yaml::{Mapping, Value};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::find_syntax;
use crate::error::Result;
use crate::util::{escape_html, language_class};

/// Prefix of CSS classes on highlighted spans.
pub const CLASS_PREFIX: &str = "hl-";

const DEFAULT_CSS_CLASS: &str = "highlight";

/// Rouge style highlighter.
#[derive(Debug)]
pub struct RougeHighlighter {
    syntax_set: SyntaxSet,
    css_class: String,
}

impl RougeHighlighter {
    /// Creates highlighter reading `css_class` from the options.
    pub fn new(syntax_set: SyntaxSet, opts: &Mapping) -> Self {
        let css_class = opts
            .get("css_class")
            .and_then(Value::as_str)
            .filter(|class| !class.is_empty())
            .unwrap_or(DEFAULT_CSS_CLASS)
            .to_string();

        Self {
            syntax_set,
            css_class,
        }
    }

    /// Renders a code block wrapped in `highlighter-rouge` markup.
    ///
    /// # Errors
    ///
    /// Returns error if syntect fails to parse a line.
    pub fn render(&self, code: &str, language: &str) -> Result<String> {
        let body = self.highlight(code, language)?;
        let language = language_class(language);
        let class = escape_html(&self.css_class);

        Ok(format!(
            "<div class=\"{language} highlighter-rouge\">\
             <div class=\"{class}\"><pre class=\"{class}\"><code>{body}</code></pre></div>\
             </div>"
        ))
    }

    fn highlight(&self, code: &str, language: &str) -> Result<String> {
        if code.is_empty() {
            return Ok(String::new());
        }

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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter(opts: &str) -> RougeHighlighter {
        let opts: Mapping = serde_yaml::from_str(opts).expect("Test YAML should parse");
        RougeHighlighter::new(SyntaxSet::load_defaults_newlines(), &opts)
    }

    #[test]
    fn test_render_wraps_in_rouge_layout() {
        // Arrange
        let rouge = highlighter("{}");

        // Act
        let html = rouge
            .render("fn main() {}\n", "rust")
            .expect("Should render");

        // Assert
        assert!(
            html.starts_with(
                "<div class=\"language-rust highlighter-rouge\">\
                 <div class=\"highlight\"><pre class=\"highlight\"><code>"
            ),
            "Unexpected wrapper: {}",
            html
        );
        assert!(html.ends_with("</code></pre></div></div>"));
        assert!(html.contains("hl-"), "Should contain prefixed classes: {}", html);
    }

    #[test]
    fn test_css_class_option() {
        // Arrange
        let rouge = highlighter("css_class: syntax");

        // Act
        let html = rouge.render("x = 1\n", "python").expect("Should render");

        // Assert
        assert!(html.contains("<div class=\"syntax\"><pre class=\"syntax\">"));
    }

    #[test]
    fn test_unknown_language_is_escaped_plain_text() {
        // Arrange
        let rouge = highlighter("{}");

        // Act
        let html = rouge
            .render("<tag> & stuff\n", "no-such-language")
            .expect("Should render");

        // Assert
        assert!(html.contains("&lt;tag&gt; &amp; stuff"), "{}", html);
        assert!(html.contains("language-no-such-language"));
    }

    #[test]
    fn test_empty_code() {
        // Arrange
        let rouge = highlighter("{}");

        // Act
        let html = rouge.render("", "rust").expect("Should render");

        // Assert
        assert!(html.contains("<code></code>"));
    }
}
