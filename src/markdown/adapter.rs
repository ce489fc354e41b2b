//! Markdown conversion driven by Jekyll style kramdown configuration.

use serde_yaml::{Mapping, Value};

use super::engine::EngineOptions;
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::options::{
    DEFAULT_HIGHLIGHTER, Deprecation, ENGINE_KEY, Normalized, mapping_entry, normalize,
    scalar_string,
};
use crate::util::decode_html;

const CODE_BLOCK_OPEN: &str = "<pre><code class=\"language-";
const CODE_BLOCK_CLOSE: &str = "</code></pre>";

/// Converts markdown to HTML with configuration normalized once up front.
///
/// Construction reads the `kramdown` block of site configuration, resolves
/// the syntax highlighter, rewrites legacy CodeRay options and loads the
/// matching highlighting backend. The adapter is then used read-only for
/// any number of [`convert`](Self::convert) calls.
///
/// # Examples
///
/// ```no_run
/// use kramdown_compat::MarkdownAdapter;
///
/// let config: serde_yaml::Mapping = serde_yaml::from_str("kramdown:\n  input: GFM\n")?;
/// let adapter = MarkdownAdapter::new(&config)?;
/// let html = adapter.convert("# Hello")?;
/// assert!(html.contains("Hello"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct MarkdownAdapter {
    normalized: Normalized,
    highlighter: Highlighter,
    engine: EngineOptions,
}

impl MarkdownAdapter {
    /// Creates adapter falling back to [`DEFAULT_HIGHLIGHTER`].
    ///
    /// # Errors
    ///
    /// Returns error if the highlighting backend cannot be loaded.
    pub fn new(site_config: &Mapping) -> Result<Self> {
        Self::with_default_highlighter(site_config, DEFAULT_HIGHLIGHTER)
    }

    /// Creates adapter with a caller supplied fallback highlighter.
    ///
    /// The fallback only applies when neither `kramdown.syntax_highlighter`,
    /// `kramdown.enable_coderay` nor the top-level `highlighter` key selects
    /// one. Malformed configuration is filled with defaults, never rejected.
    ///
    /// # Arguments
    ///
    /// * `site_config`: Site configuration holding an optional `kramdown` block
    /// * `default_highlighter`: Highlighter used when nothing else selects one
    ///
    /// # Errors
    ///
    /// Returns [`Error::EngineUnavailable`](crate::Error::EngineUnavailable)
    /// if bundled highlighting data is missing.
    pub fn with_default_highlighter(
        site_config: &Mapping,
        default_highlighter: &str,
    ) -> Result<Self> {
        let engine_config = mapping_entry(site_config, ENGINE_KEY)
            .cloned()
            .unwrap_or_default();

        let fallback = site_config
            .get("highlighter")
            .and_then(scalar_string)
            .unwrap_or_else(|| default_highlighter.to_string());

        let normalized = normalize(&engine_config, &fallback);
        for deprecation in &normalized.deprecations {
            tracing::warn!("{}", deprecation);
        }

        let highlighter =
            Highlighter::load(&normalized.highlighter, normalized.highlighter_opts())?;
        let engine = EngineOptions::from_config(&normalized.config);

        tracing::debug!(
            highlighter = %normalized.highlighter,
            backend = highlighter.name(),
            "Markdown adapter ready"
        );

        Ok(Self {
            normalized,
            highlighter,
            engine,
        })
    }

    /// Resolved highlighter name.
    pub fn highlighter(&self) -> &str {
        &self.normalized.highlighter
    }

    /// Normalized `kramdown` block.
    pub fn config(&self) -> &Mapping {
        &self.normalized.config
    }

    /// Normalized `syntax_highlighter_opts`.
    pub fn highlighter_opts(&self) -> &Mapping {
        self.normalized.highlighter_opts()
    }

    /// Highlighting theme named by `syntax_highlighter_opts.theme`.
    pub fn theme(&self) -> Option<&str> {
        self.highlighter_opts().get("theme").and_then(Value::as_str)
    }

    /// Deprecated configuration found during construction.
    pub fn deprecations(&self) -> &[Deprecation] {
        &self.normalized.deprecations
    }

    /// Converts markdown content to HTML.
    ///
    /// The engine is configured fresh for every call; fenced code blocks
    /// are then passed through the selected highlighting backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Highlight`](crate::Error::Highlight) if a code block
    /// fails to highlight.
    pub fn convert(&self, content: &str) -> Result<String> {
        let options = self.engine.to_comrak();
        let html = comrak::markdown_to_html(content, &options);

        if matches!(self.highlighter, Highlighter::Plain) {
            return Ok(html);
        }

        self.highlight_code_blocks(&html)
    }

    /// Replaces `<pre><code class="language-X">` blocks with backend markup.
    fn highlight_code_blocks(&self, html: &str) -> Result<String> {
        let mut result = String::with_capacity(html.len());
        let mut last_end = 0;
        let mut search_pos = 0;

        while let Some(found) = html[search_pos..].find(CODE_BLOCK_OPEN) {
            let block_start = search_pos + found;
            let lang_start = block_start + CODE_BLOCK_OPEN.len();

            let Some(lang_len) = html[lang_start..].find('"') else {
                break;
            };
            let lang_end = lang_start + lang_len;

            let Some(tag_len) = html[lang_end..].find('>') else {
                break;
            };
            let content_start = lang_end + tag_len + 1;

            let Some(content_len) = html[content_start..].find(CODE_BLOCK_CLOSE) else {
                break;
            };
            let content_end = content_start + content_len;
            let block_end = content_end + CODE_BLOCK_CLOSE.len();

            let language = decode_html(&html[lang_start..lang_end]);
            let code = decode_html(&html[content_start..content_end]);

            result.push_str(&html[last_end..block_start]);
            match self.highlighter.render_block(&code, &language)? {
                Some(markup) => result.push_str(&markup),
                None => result.push_str(&html[block_start..block_end]),
            }

            last_end = block_end;
            search_pos = block_end;
        }

        result.push_str(&html[last_end..]);
        Ok(result)
    }
}
