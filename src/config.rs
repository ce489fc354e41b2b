//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_yaml::{Mapping, Value};
use std::io::Read;
use std::path::PathBuf;

use crate::site_config::load_site_config;

/// Path argument standing for standard input.
const STDIN: &str = "-";

/// Command line configuration for kramdown-compat.
#[derive(Debug, Clone, Parser)]
#[command(name = "kramdown-compat", version, about, long_about = None)]
pub struct Config {
    /// Markdown file to convert (standard input when absent or "-")
    pub input: Option<PathBuf>,

    /// Output file (standard output when absent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Site configuration in _config.yml format
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Highlighter overriding the top-level `highlighter` key
    #[arg(long)]
    pub highlighter: Option<String>,

    /// Wrap output in a complete HTML page
    #[arg(long)]
    pub standalone: bool,

    /// Page title for standalone output
    #[arg(long)]
    pub title: Option<String>,

    /// Write the highlighting stylesheet to this path
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// Theme for highlighting colors (InspiredGitHub, base16-ocean.light, etc.)
    #[arg(long)]
    pub theme: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file or site configuration does not exist.
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = self.input_path().filter(|path| !path.exists()) {
            bail!("Input file does not exist: {}", input.display());
        }

        if let Some(config) = self.config.as_ref().filter(|path| !path.exists()) {
            bail!("Site configuration does not exist: {}", config.display());
        }

        Ok(())
    }

    /// Input file, `None` when reading standard input.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != STDIN)
    }

    /// Reads markdown from the input file or standard input.
    ///
    /// # Errors
    ///
    /// Returns error if the input cannot be read as UTF8.
    pub fn read_input(&self) -> Result<String> {
        match self.input_path() {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .context("Failed to read standard input")?;
                Ok(content)
            }
        }
    }

    /// Loads site configuration and applies the highlighter override.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration file cannot be loaded.
    pub fn site_config(&self) -> Result<Mapping> {
        let mut site = match &self.config {
            Some(path) => load_site_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Mapping::new(),
        };

        if let Some(highlighter) = &self.highlighter {
            site.insert(
                Value::from("highlighter"),
                Value::from(highlighter.as_str()),
            );
        }

        if let Some(theme) = &self.theme {
            set_highlighter_theme(&mut site, theme);
        }

        Ok(site)
    }

    /// Returns page title from configuration or input file name.
    pub fn page_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }

        self.input_path()
            .and_then(|path| path.file_stem())
            .and_then(|stem| stem.to_str())
            .map(String::from)
            .unwrap_or_else(|| "Document".to_string())
    }
}

/// Sets `kramdown.syntax_highlighter_opts.theme`, creating missing blocks.
fn set_highlighter_theme(site: &mut Mapping, theme: &str) {
    let mut kramdown = child_mapping(site, "kramdown");
    let mut opts = child_mapping(&kramdown, "syntax_highlighter_opts");

    opts.insert(Value::from("theme"), Value::from(theme));
    kramdown.insert(Value::from("syntax_highlighter_opts"), Value::Mapping(opts));
    site.insert(Value::from("kramdown"), Value::Mapping(kramdown));
}

fn child_mapping(parent: &Mapping, key: &str) -> Mapping {
    parent
        .get(key)
        .and_then(Value::as_mapping)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn base_config() -> Config {
        Config {
            input: None,
            output: None,
            config: None,
            highlighter: None,
            standalone: false,
            title: None,
            css: None,
            theme: None,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_arguments() {
        // Arrange
        let args = [
            "kramdown-compat",
            "post.md",
            "-o",
            "post.html",
            "-c",
            "_config.yml",
            "--highlighter",
            "coderay",
            "--standalone",
        ];

        // Act
        let config = Config::try_parse_from(args).expect("Arguments should parse");

        // Assert
        assert_eq!(config.input, Some(PathBuf::from("post.md")));
        assert_eq!(config.output, Some(PathBuf::from("post.html")));
        assert_eq!(config.config, Some(PathBuf::from("_config.yml")));
        assert_eq!(config.highlighter.as_deref(), Some("coderay"));
        assert!(config.standalone);
    }

    #[test]
    fn test_dash_input_is_stdin() {
        // Arrange
        let config = Config {
            input: Some(PathBuf::from("-")),
            ..base_config()
        };

        // Act & Assert
        assert_eq!(config.input_path(), None);
        assert!(config.validate().is_ok(), "Stdin needs no file");
    }

    #[test]
    fn test_validate_missing_input() {
        // Arrange
        let config = Config {
            input: Some(PathBuf::from("/nonexistent/post.md")),
            ..base_config()
        };

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Input file does not exist")
        );
    }

    #[test]
    fn test_validate_missing_site_config() {
        // Arrange
        let config = Config {
            config: Some(PathBuf::from("/nonexistent/_config.yml")),
            ..base_config()
        };

        // Act
        let result = config.validate();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_site_config_applies_highlighter_override() {
        // Arrange
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("_config.yml");
        fs::write(&path, "highlighter: rouge\nkramdown:\n  input: GFM\n")
            .expect("Should write config");
        let config = Config {
            config: Some(path),
            highlighter: Some("coderay".to_string()),
            ..base_config()
        };

        // Act
        let site = config.site_config().expect("Should load site config");

        // Assert
        assert_eq!(site.get("highlighter"), Some(&Value::from("coderay")));
        assert!(site.get("kramdown").is_some());
    }

    #[test]
    fn test_site_config_sets_theme() {
        // Arrange
        let config = Config {
            theme: Some("base16-ocean.light".to_string()),
            ..base_config()
        };

        // Act
        let site = config.site_config().expect("Should build site config");

        // Assert
        let theme = site
            .get("kramdown")
            .and_then(|k| k.get("syntax_highlighter_opts"))
            .and_then(|o| o.get("theme"));
        assert_eq!(theme, Some(&Value::from("base16-ocean.light")));
    }

    #[test]
    fn test_site_config_defaults_to_empty() {
        // Arrange & Act
        let site = base_config().site_config().expect("Should build empty config");

        // Assert
        assert!(site.is_empty());
    }

    #[test]
    fn test_page_title() {
        // Arrange
        let explicit = Config {
            title: Some("Release Notes".to_string()),
            ..base_config()
        };
        let from_file = Config {
            input: Some(PathBuf::from("docs/getting-started.md")),
            ..base_config()
        };

        // Act & Assert
        assert_eq!(explicit.page_title(), "Release Notes");
        assert_eq!(from_file.page_title(), "getting-started");
        assert_eq!(base_config().page_title(), "Document");
    }

    #[test]
    fn test_read_input_from_file() {
        // Arrange
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("post.md");
        fs::write(&path, "# Title\n").expect("Should write input");
        let config = Config {
            input: Some(path),
            ..base_config()
        };

        // Act
        let content = config.read_input().expect("Should read input");

        // Assert
        assert_eq!(content, "# Title\n");
    }
}
