//! flowlint: static validator for Kestra flow definitions.
//!
//! Loads a flow YAML file, runs a fixed set of independent structural checks
//! and reports every violation in one pass.

pub mod cli;
pub mod error;
pub mod render;
pub mod validation;

pub use error::FlowError;
pub use validation::{FlowReport, FlowValidator, ValidatorConfig};
