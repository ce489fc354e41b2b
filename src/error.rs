//! Error types.

use std::path::PathBuf;

/// Errors raised while loading configuration, preparing the engine, or
/// rendering markdown.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Highlighting data required by the engine could not be loaded.
    #[error("Markdown engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Syntax highlighting failed while rendering a code block.
    #[error("Failed to highlight code block: {0}")]
    Highlight(#[from] syntect::Error),

    /// A configuration or stylesheet file could not be read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Site configuration is not valid YAML.
    #[error("Invalid site configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Site configuration root is not a mapping.
    #[error("Site configuration must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
