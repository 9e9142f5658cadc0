//! Error types for flowlint.
//!
//! Only load-time failures are errors. Structural problems found inside a
//! loaded flow are collected as [`crate::validation::Violation`]s instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort validation of a single flow file.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error walking '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("YAML syntax error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Flow document must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

impl FlowError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::NotFound(_) => "not_found",
            FlowError::Io { .. } => "io",
            FlowError::Walk { .. } => "walk",
            FlowError::Parse(_) => "parse",
            FlowError::NotAMapping { .. } => "not_a_mapping",
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
