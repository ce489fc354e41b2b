//! Page layout wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Wraps converted markdown in a complete HTML document.
///
/// # Arguments
///
/// * `title`: Page title text
/// * `stylesheets`: CSS file paths to link
/// * `body`: Converted HTML, inserted without escaping
///
/// # Returns
///
/// Complete HTML document
pub fn page_wrapper(title: &str, stylesheets: &[&str], body: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @for stylesheet in stylesheets {
                    link rel="stylesheet" href=(stylesheet);
                }
            }
            body {
                main class="content" {
                    (PreEscaped(body))
                }
            }
        }
    }
}
