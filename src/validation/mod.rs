//! Validation of Kestra flow definitions.
//!
//! Each rule lives in its own module as a free function over a loaded
//! [`Document`] returning a [`CheckResult`]. [`FlowValidator`] runs them all
//! and folds the results into a [`FlowReport`].

pub mod config;
pub mod conventions;
pub mod declarations;
pub mod document;
pub mod report;
pub mod required;
pub mod tasks;
pub mod validator;

pub use config::ValidatorConfig;
pub use document::Document;
pub use report::{
    CheckResult, FlowReport, Marker, Severity, TranscriptLine, Violation, ViolationKind,
};
pub use tasks::TaskKind;
pub use validator::FlowValidator;
