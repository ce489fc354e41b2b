//! Translation of normalized kramdown settings into comrak options.

use comrak::Options;
use serde_yaml::{Mapping, Value};

use crate::options::{SYNTAX_HIGHLIGHTER_OPTS, is_truthy, mapping_entry};

/// Input dialect Jekyll configures when `input` is absent.
const DEFAULT_INPUT: &str = "GFM";

/// Engine settings read from the normalized `kramdown` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// GitHub Flavored Markdown extensions on top of kramdown syntax.
    pub gfm: bool,
    /// Heading id prefix, `None` when `auto_ids` is off.
    pub header_ids: Option<String>,
    pub hard_wrap: bool,
    pub smart_quotes: bool,
    /// Language assumed for fences without an info string.
    pub default_lang: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            header_ids: Some(String::new()),
            hard_wrap: false,
            smart_quotes: true,
            default_lang: None,
        }
    }
}

impl EngineOptions {
    /// Reads engine settings, keeping defaults for absent keys.
    pub fn from_config(config: &Mapping) -> Self {
        let defaults = Self::default();

        let gfm = config
            .get("input")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_INPUT)
            .eq_ignore_ascii_case(DEFAULT_INPUT);

        let header_ids = match config.get("auto_ids") {
            Some(flag) if !is_truthy(Some(flag)) => None,
            _ => Some(
                config
                    .get("auto_id_prefix")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
        };

        let default_lang = mapping_entry(config, SYNTAX_HIGHLIGHTER_OPTS)
            .and_then(|opts| opts.get("default_lang"))
            .and_then(Value::as_str)
            .filter(|lang| !lang.is_empty())
            .map(String::from);

        Self {
            gfm,
            header_ids,
            hard_wrap: config
                .get("hard_wrap")
                .map_or(defaults.hard_wrap, |v| is_truthy(Some(v))),
            smart_quotes: config
                .get("smart_quotes")
                .map_or(defaults.smart_quotes, |v| is_truthy(Some(v))),
            default_lang,
        }
    }

    /// Builds comrak options for one conversion.
    ///
    /// Tables, footnotes and definition lists belong to kramdown syntax and
    /// are always on. Raw HTML passes through as kramdown does.
    pub fn to_comrak(&self) -> Options<'static> {
        let mut options = Options::default();

        options.extension.table = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;
        options.extension.header_ids = self.header_ids.clone();

        if self.gfm {
            options.extension.strikethrough = true;
            options.extension.autolink = true;
            options.extension.tasklist = true;
            options.extension.tagfilter = true;
        }

        options.parse.smart = self.smart_quotes;
        options.parse.default_info_string = self.default_lang.clone();

        options.render.hardbreaks = self.hard_wrap;
        options.render.unsafe_ = true;

        options
    }
}
