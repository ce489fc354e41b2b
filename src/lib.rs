//! Markdown to HTML conversion driven by Jekyll style kramdown configuration.
//!
//! [`MarkdownAdapter`] normalizes the `kramdown` block of a site
//! configuration once, resolving the syntax highlighter from
//! `syntax_highlighter`, the deprecated `enable_coderay` flag and the
//! top-level `highlighter` key, then renders any number of documents with
//! comrak.

mod assets;
pub mod components;
mod config;
mod error;
mod highlight;
mod markdown;
pub mod options;
mod site_config;
mod util;

pub use assets::{stylesheet, write_stylesheet};
pub use config::Config;
pub use error::{Error, Result};
pub use highlight::{
    CoderayHighlighter, CoderayOptions, CssMode, DEFAULT_THEME, Highlighter, LineNumbers,
    RougeHighlighter, Wrap,
};
pub use markdown::{EngineOptions, MarkdownAdapter};
pub use options::{Deprecation, Normalized, normalize};
pub use site_config::{load_site_config, parse_site_config};
