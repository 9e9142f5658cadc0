//! Rule configuration for flow validation.

use serde::{Deserialize, Serialize};

/// Marker that classifies a task type as a shell script task.
pub const DEFAULT_SCRIPT_MARKER: &str = "shell.Script";

/// Top-level keys every flow must define.
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "namespace", "tasks"];

/// Current spelling of the retry attempt count.
pub const MAX_ATTEMPTS_KEY: &str = "maxAttempts";

/// Deprecated spelling of the retry attempt count.
pub const DEPRECATED_MAX_ATTEMPT_KEY: &str = "maxAttempt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Substring of a task `type` that marks a shell script task.
    pub script_marker: String,
    /// Treat warnings as errors when computing the verdict.
    pub strict: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            script_marker: DEFAULT_SCRIPT_MARKER.to_string(),
            strict: false,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shell script classification marker.
    pub fn with_script_marker(mut self, marker: impl Into<String>) -> Self {
        self.script_marker = marker.into();
        self
    }

    /// Sets whether warnings fail the verdict.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.script_marker, "shell.Script");
        assert!(!config.strict);
    }

    #[test]
    fn test_builder() {
        let config = ValidatorConfig::new()
            .with_script_marker("python.Script")
            .with_strict(true);
        assert_eq!(config.script_marker, "python.Script");
        assert!(config.strict);
    }
}
