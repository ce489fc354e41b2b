use anyhow::{Context, Result};
use kramdown_compat::components::layout::page_wrapper;
use kramdown_compat::{Config, MarkdownAdapter, write_stylesheet};
use std::fs;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::parse();

    // --verbose enables DEBUG, otherwise RUST_LOG or WARN
    let filter = if config.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    config.validate().context("Invalid configuration")?;

    let site = config.site_config()?;
    let adapter = MarkdownAdapter::new(&site).context("Failed to prepare markdown engine")?;

    let content = config.read_input()?;
    let html = adapter
        .convert(&content)
        .context("Failed to convert markdown")?;

    if let Some(css_path) = &config.css {
        write_stylesheet(css_path, adapter.highlighter(), adapter.theme())
            .context("Failed to write stylesheet")?;
        tracing::info!(path = %css_path.display(), "Wrote stylesheet");
    }

    let html = if config.standalone {
        let stylesheets: Vec<&str> = config
            .css
            .as_deref()
            .and_then(|path| path.to_str())
            .into_iter()
            .collect();
        page_wrapper(&config.page_title(), &stylesheets, &html).into_string()
    } else {
        html
    };

    match &config.output {
        Some(path) => fs::write(path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .context("Failed to write standard output")?,
    }

    Ok(())
}
