//! Loading a flow file into a read-only document tree.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{FlowError, Result};

/// Root of a parsed flow definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Mapping,
}

impl Document {
    /// Parse flow text. The root must be a single YAML mapping. `<<` merge
    /// keys are resolved before any rule sees the tree.
    pub fn parse(text: &str) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(text)?;
        value.apply_merge()?;
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            other => Err(FlowError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }

    /// Read and parse a flow file. Existence is checked before reading.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FlowError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| FlowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read flow file");
        Self::parse(&text)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Text form of a top-level value, or an empty string when absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(display_value).unwrap_or_default()
    }
}

/// Render a YAML value for diagnostics. Scalars print bare; collections
/// print on one line as compact JSON (or YAML when keys are not strings).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => display_value(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value)
            .or_else(|_| serde_yaml::to_string(value).map(|s| s.trim_end().replace('\n', " ")))
            .unwrap_or_else(|_| value_kind(value).to_string()),
    }
}

/// Human-readable name of a value's shape.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
