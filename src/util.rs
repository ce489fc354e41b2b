//! HTML text helpers shared by the renderer and highlight backends.

/// Escapes HTML special characters.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Decodes the entities the markdown engine emits inside code blocks.
///
/// `&amp;` is decoded last so that escaped entity text such as `&amp;lt;`
/// survives as `&lt;`.
pub fn decode_html(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Class attribute value naming a code block language.
pub fn language_class(language: &str) -> String {
    format!("language-{}", escape_html(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_all_characters() {
        // Arrange
        let input = r#"<>&"'"#;

        // Act
        let output = escape_html(input);

        // Assert
        assert_eq!(output, "&lt;&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_language_class_escapes() {
        // Arrange & Act & Assert
        assert_eq!(language_class("c\"x"), "language-c&quot;x");
        assert_eq!(language_class("rust"), "language-rust");
    }

    #[test]
    fn test_decode_html_reverses_escape() {
        // Arrange
        let input = r#"if a < b && c > "d" { 'e' }"#;

        // Act
        let output = decode_html(&escape_html(input));

        // Assert
        assert_eq!(output, input);
    }

    #[test]
    fn test_decode_html_keeps_escaped_entities() {
        // Arrange
        let input = "&amp;lt;div&amp;gt;";

        // Act
        let output = decode_html(input);

        // Assert
        assert_eq!(output, "&lt;div&gt;");
    }
}
