//! Normalization of kramdown configuration.
//!
//! Resolves the syntax highlighter from the overlapping configuration keys
//! and rewrites legacy CodeRay options into the shape current highlighter
//! backends read. Normalization never fails: missing or malformed entries
//! are replaced with defaults.
//!
//! Highlighter precedence, first match wins:
//!
//! 1. `kramdown.syntax_highlighter`
//! 2. `kramdown.enable_coderay` (deprecated)
//! 3. fallback highlighter supplied by the caller

use serde_yaml::{Mapping, Value};
use std::fmt;
use std::sync::LazyLock;

/// Modern class based highlighter.
pub const ROUGE: &str = "rouge";

/// Legacy highlighter kept for backward compatibility.
pub const CODERAY: &str = "coderay";

/// Highlighter used when neither configuration nor caller selects one.
pub const DEFAULT_HIGHLIGHTER: &str = ROUGE;

/// Key of the engine sub-mapping in site configuration.
pub const ENGINE_KEY: &str = "kramdown";

pub(crate) const SYNTAX_HIGHLIGHTER: &str = "syntax_highlighter";
pub(crate) const SYNTAX_HIGHLIGHTER_OPTS: &str = "syntax_highlighter_opts";
const ENABLE_CODERAY: &str = "enable_coderay";
const LEGACY_OPTS: &str = "coderay";
const LEGACY_PREFIX: &str = "coderay_";

/// Deprecated configuration usage found during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecation {
    /// `enable_coderay` selected the legacy highlighter.
    EnableCoderay,
    /// A `coderay_` prefixed option was renamed.
    PrefixedKey { key: String, normalized: String },
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deprecation::EnableCoderay => write!(
                f,
                "'enable_coderay' is deprecated and will be removed, \
                 use 'syntax_highlighter: coderay' instead"
            ),
            Deprecation::PrefixedKey { key, normalized } => write!(
                f,
                "Legacy CodeRay option '{}' is normalized to '{}'",
                key, normalized
            ),
        }
    }
}

/// Engine configuration after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Engine sub-mapping with highlighter keys filled in.
    pub config: Mapping,
    /// Resolved highlighter name, never empty.
    pub highlighter: String,
    /// Deprecated usages in the order they were found.
    pub deprecations: Vec<Deprecation>,
}

impl Normalized {
    /// Options passed to the highlighter backend.
    pub fn highlighter_opts(&self) -> &Mapping {
        mapping_entry(&self.config, SYNTAX_HIGHLIGHTER_OPTS).unwrap_or(&*EMPTY)
    }
}

static EMPTY: LazyLock<Mapping> = LazyLock::new(Mapping::new);

/// Default options layered under the legacy CodeRay sub-mapping.
pub fn coderay_defaults() -> Mapping {
    [
        ("bold_every", Value::from(10)),
        ("css", Value::from("style")),
        ("line_numbers", Value::from("inline")),
        ("line_number_start", Value::from(1)),
        ("wrap", Value::from("div")),
        ("tab_width", Value::from(4)),
    ]
    .into_iter()
    .map(|(k, v)| (Value::from(k), v))
    .collect()
}

/// Normalizes an engine sub-mapping.
///
/// The input is left untouched. The returned configuration keeps an
/// explicitly set `syntax_highlighter` as written and otherwise stores the
/// resolved name; `syntax_highlighter_opts` and `coderay` are always
/// mappings.
///
/// # Arguments
///
/// * `engine_config`: The `kramdown` block of site configuration
/// * `fallback`: Highlighter used when the block selects none
pub fn normalize(engine_config: &Mapping, fallback: &str) -> Normalized {
    let mut deprecations = Vec::new();
    let highlighter = resolve_highlighter(engine_config, fallback, &mut deprecations);

    let opts = mapping_or_empty(engine_config.get(SYNTAX_HIGHLIGHTER_OPTS));
    let legacy = mapping_or_empty(engine_config.get(LEGACY_OPTS));

    let opts = if highlighter == CODERAY {
        let merged = merge(&merge(&opts, &coderay_defaults()), &legacy);
        strip_legacy_prefix(&merged, &mut deprecations)
    } else {
        opts
    };

    let mut config = engine_config.clone();
    if !is_explicit(engine_config.get(SYNTAX_HIGHLIGHTER)) {
        config.insert(
            Value::from(SYNTAX_HIGHLIGHTER),
            Value::from(highlighter.as_str()),
        );
    }
    config.insert(Value::from(SYNTAX_HIGHLIGHTER_OPTS), Value::Mapping(opts));
    config.insert(Value::from(LEGACY_OPTS), Value::Mapping(legacy));

    Normalized {
        config,
        highlighter,
        deprecations,
    }
}

fn resolve_highlighter(
    config: &Mapping,
    fallback: &str,
    deprecations: &mut Vec<Deprecation>,
) -> String {
    if let Some(explicit) = config.get(SYNTAX_HIGHLIGHTER).and_then(scalar_string) {
        return explicit;
    }

    if is_truthy(config.get(ENABLE_CODERAY)) {
        deprecations.push(Deprecation::EnableCoderay);
        return CODERAY.to_string();
    }

    if fallback.is_empty() {
        DEFAULT_HIGHLIGHTER.to_string()
    } else {
        fallback.to_string()
    }
}

/// Overlays `overlay` onto a copy of `base`. Existing keys keep their
/// position and take the overlay value.
fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Renames `coderay_` prefixed keys. When a stripped key collides with an
/// existing one, whichever comes later in the mapping wins.
fn strip_legacy_prefix(opts: &Mapping, deprecations: &mut Vec<Deprecation>) -> Mapping {
    let mut stripped = Mapping::with_capacity(opts.len());

    for (key, value) in opts {
        let renamed = key
            .as_str()
            .and_then(|k| k.strip_prefix(LEGACY_PREFIX).map(|cleaned| (k, cleaned)));

        let key = match renamed {
            Some((original, cleaned)) => {
                deprecations.push(Deprecation::PrefixedKey {
                    key: original.to_string(),
                    normalized: cleaned.to_string(),
                });
                Value::from(cleaned)
            }
            None => key.clone(),
        };
        stripped.insert(key, value.clone());
    }

    stripped
}

/// Anything but null and `false` counts as set.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Tagged(tagged)) => is_truthy(Some(&tagged.value)),
        Some(_) => true,
    }
}

/// Set to something other than null, `false` or an empty string.
fn is_explicit(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Tagged(tagged)) => is_explicit(Some(&tagged.value)),
        other => is_truthy(other),
    }
}

/// String form of a scalar selection. Null, `false`, empty strings and
/// collections select nothing.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        _ => None,
    }
}

pub(crate) fn mapping_entry<'a>(config: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    config.get(key).and_then(Value::as_mapping)
}

fn mapping_or_empty(value: Option<&Value>) -> Mapping {
    value.and_then(Value::as_mapping).cloned().unwrap_or_default()
}
