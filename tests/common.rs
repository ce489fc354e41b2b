//! Shared test utilities for integration tests.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Site directory holding `_config.yml` and one markdown document.
pub struct TestSite {
    pub dir: TempDir,
    pub config: PathBuf,
    pub document: PathBuf,
}

/// Creates temporary site with configuration and document content.
///
/// # Errors
///
/// Returns error if the directory or files cannot be created
pub fn create_test_site(config: &str, markdown: &str) -> Result<TestSite> {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("_config.yml");
    let document_path = dir.path().join("post.md");

    fs::write(&config_path, config)?;
    fs::write(&document_path, markdown)?;

    Ok(TestSite {
        dir,
        config: config_path,
        document: document_path,
    })
}

/// Markdown document with a fenced Ruby code block.
#[allow(dead_code)]
pub const RUBY_POST: &str = "# Post\n\nSome *text*.\n\n```ruby\ndef hello\n  puts \"hi\"\nend\n```\n";
