//! Site configuration loading.
//!
//! Site configuration is a YAML mapping in the shape of a Jekyll
//! `_config.yml`. Only the top-level `highlighter` key and the `kramdown`
//! block are read by the converter; everything else is carried along.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parses site configuration from YAML text.
///
/// An empty document yields an empty mapping.
///
/// # Errors
///
/// Returns error if the text is not valid YAML or its root is not a mapping.
pub fn parse_site_config(content: &str) -> Result<Mapping> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(Error::NotAMapping(kind(&other))),
    }
}

/// Reads and parses a site configuration file.
///
/// # Errors
///
/// Returns error if the file cannot be read or does not parse.
pub fn load_site_config(path: &Path) -> Result<Mapping> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_site_config(&content)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
