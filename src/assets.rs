//! Stylesheets for class based highlighting output

use std::{fs, path::Path};
use syntect::html::{ClassStyle, css_for_theme_with_class_style};

use crate::error::{Error, Result};
use crate::highlight::{CODERAY_CLASS_PREFIX, ROUGE_CLASS_PREFIX, load_theme};
use crate::options::{CODERAY, ROUGE};

const CODERAY_LAYOUT: &str = "\
.CodeRay .line-numbers {
  padding-right: 0.5em;
  color: #888;
  user-select: none;
}
.CodeRay .line-numbers strong {
  color: #333;
}
.CodeRay table {
  border-collapse: collapse;
}
.CodeRay td.line-numbers {
  text-align: right;
  vertical-align: top;
}
";

/// Builds the stylesheet for a highlighter.
///
/// Token colors come from the named bundled theme, or the default theme when
/// `theme` is `None` or unknown. Backends without class output get an empty
/// stylesheet.
///
/// # Errors
///
/// Returns error if the theme cannot be loaded or converted to CSS.
pub fn stylesheet(highlighter: &str, theme: Option<&str>) -> Result<String> {
    let prefix = match highlighter {
        ROUGE => ROUGE_CLASS_PREFIX,
        CODERAY => CODERAY_CLASS_PREFIX,
        _ => return Ok(String::new()),
    };

    let theme = load_theme(theme)?;
    let mut css = css_for_theme_with_class_style(&theme, ClassStyle::SpacedPrefixed { prefix })?;

    if highlighter == CODERAY {
        css.push('\n');
        css.push_str(CODERAY_LAYOUT);
    }

    Ok(css)
}

/// Writes the stylesheet for a highlighter to `path`.
pub fn write_stylesheet(path: &Path, highlighter: &str, theme: Option<&str>) -> Result<()> {
    let css = stylesheet(highlighter, theme)?;
    fs::write(path, css).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rouge_stylesheet_uses_prefix() {
        // Arrange & Act
        let css = stylesheet("rouge", None).expect("Should build stylesheet");

        // Assert
        assert!(css.contains(".hl-"), "Should style prefixed classes");
        assert!(!css.contains(".CodeRay"));
    }

    #[test]
    fn test_coderay_stylesheet_includes_layout() {
        // Arrange & Act
        let css = stylesheet("coderay", Some("base16-ocean.light")).expect("Should build");

        // Assert
        assert!(css.contains(".cr-"));
        assert!(css.contains(".CodeRay .line-numbers"));
    }

    #[test]
    fn test_plain_stylesheet_is_empty() {
        // Arrange & Act
        let css = stylesheet("rogue", None).expect("Should build");

        // Assert
        assert!(css.is_empty());
    }

    #[test]
    fn test_write_stylesheet() {
        // Arrange
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("syntax.css");

        // Act
        write_stylesheet(&path, "rouge", None).expect("Should write stylesheet");

        // Assert
        let css = fs::read_to_string(&path).expect("Should read stylesheet");
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_write_stylesheet_missing_directory() {
        // Arrange
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("missing").join("syntax.css");

        // Act
        let result = write_stylesheet(&path, "rouge", None);

        // Assert
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
