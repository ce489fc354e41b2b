//! Syntax highlighting backends for fenced code blocks.
//!
//! The backend is picked by the resolved `syntax_highlighter` name:
//! `rouge` emits class based spans, `coderay` emits the legacy CodeRay
//! layout with line numbers, and any other name leaves code blocks exactly
//! as the markdown engine rendered them.

mod coderay;
mod rouge;

use serde_yaml::{Mapping, Value};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::error::{Error, Result};
use crate::options::{CODERAY, ROUGE, is_truthy};

pub use coderay::{CoderayHighlighter, CoderayOptions, CssMode, LineNumbers, Wrap};
pub use rouge::RougeHighlighter;

pub(crate) use coderay::CLASS_PREFIX as CODERAY_CLASS_PREFIX;
pub(crate) use rouge::CLASS_PREFIX as ROUGE_CLASS_PREFIX;

/// Theme used for inline styles when none is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Highlighter selected for a conversion session.
#[derive(Debug)]
pub enum Highlighter {
    Rouge(RougeHighlighter),
    Coderay(CoderayHighlighter),
    Plain,
}

impl Highlighter {
    /// Loads the backend for a highlighter name.
    ///
    /// Unknown names, and any backend disabled through the `disable`
    /// option, resolve to [`Highlighter::Plain`].
    ///
    /// # Arguments
    ///
    /// * `name`: Resolved highlighter name
    /// * `opts`: Normalized `syntax_highlighter_opts`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineUnavailable`] if the bundled syntax definitions
    /// or the default theme are missing.
    pub fn load(name: &str, opts: &Mapping) -> Result<Self> {
        if is_truthy(opts.get("disable")) {
            tracing::debug!(highlighter = name, "Syntax highlighting disabled");
            return Ok(Highlighter::Plain);
        }

        match name {
            ROUGE => Ok(Highlighter::Rouge(RougeHighlighter::new(
                load_syntaxes()?,
                opts,
            ))),
            CODERAY => {
                let theme = load_theme(opts.get("theme").and_then(Value::as_str))?;
                Ok(Highlighter::Coderay(CoderayHighlighter::new(
                    load_syntaxes()?,
                    theme,
                    CoderayOptions::from_mapping(opts),
                )))
            }
            other => {
                tracing::debug!(
                    highlighter = other,
                    "No highlighting backend, using plain code blocks"
                );
                Ok(Highlighter::Plain)
            }
        }
    }

    /// Backend name.
    pub fn name(&self) -> &'static str {
        match self {
            Highlighter::Rouge(_) => ROUGE,
            Highlighter::Coderay(_) => CODERAY,
            Highlighter::Plain => "plain",
        }
    }

    /// Renders one code block.
    ///
    /// Returns `None` when the engine output should be kept as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Highlight`] if syntect fails on the input.
    pub fn render_block(&self, code: &str, language: &str) -> Result<Option<String>> {
        match self {
            Highlighter::Rouge(rouge) => rouge.render(code, language).map(Some),
            Highlighter::Coderay(coderay) => coderay.render(code, language).map(Some),
            Highlighter::Plain => Ok(None),
        }
    }
}

/// Loads bundled syntax definitions.
fn load_syntaxes() -> Result<SyntaxSet> {
    let syntax_set = SyntaxSet::load_defaults_newlines();
    if syntax_set.syntaxes().is_empty() {
        return Err(Error::EngineUnavailable(
            "no bundled syntax definitions".to_string(),
        ));
    }
    Ok(syntax_set)
}

/// Loads a bundled theme by name, falling back to [`DEFAULT_THEME`].
pub(crate) fn load_theme(requested: Option<&str>) -> Result<Theme> {
    let mut themes = ThemeSet::load_defaults().themes;

    if let Some(name) = requested {
        if let Some(theme) = themes.remove(name) {
            return Ok(theme);
        }
        tracing::warn!(
            theme = name,
            fallback = DEFAULT_THEME,
            "Unknown highlighting theme"
        );
    }

    themes.remove(DEFAULT_THEME).ok_or_else(|| {
        Error::EngineUnavailable(format!("bundled theme '{}' not found", DEFAULT_THEME))
    })
}

/// Finds syntax by language token or extension, plain text otherwise.
fn find_syntax<'a>(syntax_set: &'a SyntaxSet, language: &str) -> &'a SyntaxReference {
    syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_extension(language))
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Mapping {
        serde_yaml::from_str(src).expect("Test YAML should parse")
    }

    #[test]
    fn test_load_known_backends() {
        // Arrange
        let opts = Mapping::new();

        // Act
        let rouge = Highlighter::load("rouge", &opts).expect("Rouge should load");
        let coderay = Highlighter::load("coderay", &opts).expect("CodeRay should load");

        // Assert
        assert_eq!(rouge.name(), "rouge");
        assert_eq!(coderay.name(), "coderay");
    }

    #[test]
    fn test_unknown_name_is_plain() {
        // Arrange
        let opts = Mapping::new();

        // Act
        let highlighter = Highlighter::load("rogue", &opts).expect("Should load");

        // Assert
        assert!(matches!(highlighter, Highlighter::Plain));
        assert_eq!(
            highlighter
                .render_block("fn main() {}\n", "rust")
                .expect("Plain never fails"),
            None
        );
    }

    #[test]
    fn test_disable_option_forces_plain() {
        // Arrange
        let opts = yaml("disable: true");

        // Act
        let highlighter = Highlighter::load("rouge", &opts).expect("Should load");

        // Assert
        assert_eq!(highlighter.name(), "plain");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        // Arrange & Act
        let theme = load_theme(Some("No Such Theme")).expect("Fallback theme should load");
        let theme_set = ThemeSet::load_defaults();
        let expected = &theme_set.themes[DEFAULT_THEME];

        // Assert
        assert_eq!(theme.settings.background, expected.settings.background);
        assert_eq!(theme.scopes.len(), expected.scopes.len());
    }

    #[test]
    fn test_find_syntax_unknown_language_is_plain_text() {
        // Arrange
        let syntax_set = load_syntaxes().expect("Syntaxes should load");

        // Act
        let syntax = find_syntax(&syntax_set, "no-such-language");

        // Assert
        assert_eq!(syntax.name, "Plain Text");
    }

    #[test]
    fn test_find_syntax_by_extension() {
        // Arrange
        let syntax_set = load_syntaxes().expect("Syntaxes should load");

        // Act
        let syntax = find_syntax(&syntax_set, "rs");

        // Assert
        assert_eq!(syntax.name, "Rust");
    }
}
