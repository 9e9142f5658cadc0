//! Check results and the per-file validation report.
//!
//! Every check produces a [`CheckResult`]: the violations it found plus the
//! transcript lines an operator sees. [`FlowReport`] aggregates the results
//! of all checks run against one file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Severity level for a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fails the verdict.
    Error,
    /// Reported but does not fail the verdict (unless strict).
    Warning,
}

/// Category of a structural finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required key is absent.
    MissingField,
    /// A value has the wrong shape (not a list, not a mapping, empty list).
    Shape,
    /// A deprecated spelling is in use.
    Deprecation,
    /// A naming convention is broken.
    Convention,
}

/// A single finding produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Path of the offending field, e.g. `tasks[0].script`.
    pub field: String,
    pub message: String,
}

/// Marker shown in front of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Section,
    Pass,
    Fail,
    Warn,
    Info,
    Detail,
}

/// One line of the human-readable transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub marker: Marker,
    /// Nesting depth, rendered as two spaces per level.
    pub indent: usize,
    pub text: String,
}

/// Result of a single check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check that produced this result.
    pub check_name: String,
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
    #[serde(skip)]
    pub transcript: Vec<TranscriptLine>,
}

impl CheckResult {
    /// Start a check, emitting its section header.
    pub fn new(check_name: impl Into<String>, header: impl Into<String>) -> Self {
        let mut result = Self {
            check_name: check_name.into(),
            ..Self::default()
        };
        result.line(Marker::Section, 0, header);
        result
    }

    /// Whether the check found no errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn pass(&mut self, indent: usize, text: impl Into<String>) {
        self.line(Marker::Pass, indent, text);
    }

    pub fn info(&mut self, indent: usize, text: impl Into<String>) {
        self.line(Marker::Info, indent, text);
    }

    pub fn detail(&mut self, indent: usize, text: impl Into<String>) {
        self.line(Marker::Detail, indent, text);
    }

    /// Record an error and print `text` as a failed line.
    pub fn fail(
        &mut self,
        indent: usize,
        kind: ViolationKind,
        field: impl Into<String>,
        message: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.errors.push(Violation {
            kind,
            field: field.into(),
            message: message.into(),
        });
        self.line(Marker::Fail, indent, text);
    }

    /// Record a warning and print `text` as a warning line.
    pub fn warn(
        &mut self,
        indent: usize,
        kind: ViolationKind,
        field: impl Into<String>,
        message: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.warnings.push(Violation {
            kind,
            field: field.into(),
            message: message.into(),
        });
        self.line(Marker::Warn, indent, text);
    }

    fn line(&mut self, marker: Marker, indent: usize, text: impl Into<String>) {
        self.transcript.push(TranscriptLine {
            marker,
            indent,
            text: text.into(),
        });
    }
}

/// Aggregated result of validating one flow file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowReport {
    pub path: PathBuf,
    /// Overall verdict.
    pub valid: bool,
    /// Whether warnings were counted against the verdict.
    pub strict: bool,
    pub checks: Vec<CheckResult>,
}

impl FlowReport {
    /// Combine check results: the verdict is the AND of every check's `ok`,
    /// extended to warnings when `strict` is set.
    pub fn from_checks(path: impl Into<PathBuf>, checks: Vec<CheckResult>, strict: bool) -> Self {
        let valid = checks
            .iter()
            .all(|c| c.ok() && (!strict || c.warnings.is_empty()));
        Self {
            path: path.into(),
            valid,
            strict,
            checks,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.checks.iter().flat_map(|c| c.errors.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.checks.iter().flat_map(|c| c.warnings.iter())
    }

    pub fn error_count(&self) -> usize {
        self.checks.iter().map(|c| c.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.checks.iter().map(|c| c.warnings.len()).sum()
    }

    /// Look up a check result by name.
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.check_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_check() -> CheckResult {
        let mut check = CheckResult::new("tasks", "Validating tasks...");
        check.fail(
            1,
            ViolationKind::MissingField,
            "tasks[0].id",
            "Task 0 missing 'id'",
            "Missing 'id'",
        );
        check
    }

    #[test]
    fn test_new_check_is_ok_with_header() {
        let check = CheckResult::new("inputs", "Validating inputs...");
        assert!(check.ok());
        assert_eq!(check.transcript.len(), 1);
        assert_eq!(check.transcript[0].marker, Marker::Section);
    }

    #[test]
    fn test_warning_does_not_fail_check() {
        let mut check = CheckResult::new("conventions", "Checking conventions...");
        check.warn(
            0,
            ViolationKind::Convention,
            "namespace",
            "path separator",
            "Namespace contains path separators",
        );
        assert!(check.ok());
        assert_eq!(check.warnings.len(), 1);
    }

    #[test]
    fn test_report_verdict_is_and_of_checks() {
        let ok = CheckResult::new("inputs", "Validating inputs...");
        let report = FlowReport::from_checks("flow.yml", vec![ok.clone(), failing_check()], false);
        assert!(!report.valid);
        assert_eq!(report.error_count(), 1);

        let report = FlowReport::from_checks("flow.yml", vec![ok], false);
        assert!(report.valid);
    }

    #[test]
    fn test_strict_counts_warnings() {
        let mut check = CheckResult::new("tasks", "Validating tasks...");
        check.warn(1, ViolationKind::Deprecation, "tasks[0].retry.maxAttempt", "old", "old");

        let lenient = FlowReport::from_checks("flow.yml", vec![check.clone()], false);
        assert!(lenient.valid);

        let strict = FlowReport::from_checks("flow.yml", vec![check], true);
        assert!(!strict.valid);
        assert_eq!(strict.warning_count(), 1);
    }
}
