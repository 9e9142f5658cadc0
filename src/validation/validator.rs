//! The flow validator: load a document and run every check against it.

use std::path::Path;

use tracing::info;

use super::config::ValidatorConfig;
use super::conventions::check_conventions;
use super::declarations::{check_inputs, check_outputs};
use super::document::Document;
use super::report::FlowReport;
use super::required::check_required_fields;
use super::tasks::check_tasks;
use crate::error::Result;

/// Validator for Kestra flow definitions.
///
/// Load errors abort the run. Once a document is loaded every check runs,
/// so a single pass reports all structural problems.
#[derive(Debug, Clone, Default)]
pub struct FlowValidator {
    config: ValidatorConfig,
}

impl FlowValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate the flow file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::FlowError`] if the file is missing,
    /// unreadable, not valid YAML, or not a mapping.
    pub fn validate_path(&self, path: &Path) -> Result<FlowReport> {
        let doc = Document::load(path)?;
        Ok(self.validate_document(path, &doc))
    }

    /// Validate flow text that did not come from disk. `label` is used as the
    /// report path.
    pub fn validate_str(&self, label: impl AsRef<Path>, text: &str) -> Result<FlowReport> {
        let doc = Document::parse(text)?;
        Ok(self.validate_document(label.as_ref(), &doc))
    }

    /// Run every check against an already loaded document.
    pub fn validate_document(&self, path: &Path, doc: &Document) -> FlowReport {
        let checks = vec![
            check_required_fields(doc),
            check_inputs(doc),
            check_tasks(doc, &self.config),
            check_outputs(doc),
            check_conventions(doc),
        ];

        let report = FlowReport::from_checks(path, checks, self.config.strict);
        info!(
            path = %path.display(),
            valid = report.valid,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "flow validated"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::report::ViolationKind;

    const VALID: &str = r#"
id: my-flow
namespace: company.team
tasks:
  - id: t1
    type: io.kestra.plugin.scripts.shell.Script
    script: echo hi
"#;

    #[test]
    fn test_valid_flow() {
        let report = FlowValidator::default().validate_str("flow.yml", VALID).unwrap();
        assert!(report.valid);
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.checks.len(), 5);
    }

    #[test]
    fn test_missing_tasks_runs_other_checks() {
        let yaml = "id: my flow\nnamespace: a/b\noutputs:\n  - id: o\n";
        let report = FlowValidator::default().validate_str("flow.yml", yaml).unwrap();
        assert!(!report.valid);

        let missing_tasks = report
            .errors()
            .filter(|e| e.kind == ViolationKind::MissingField && e.field == "tasks")
            .count();
        assert_eq!(missing_tasks, 1);

        assert!(!report.check("outputs").unwrap().ok());
        assert!(!report.check("conventions").unwrap().ok());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let yaml = VALID.replace("company.team", "company/team");

        let lenient = FlowValidator::default().validate_str("flow.yml", &yaml).unwrap();
        assert!(lenient.valid);

        let strict = FlowValidator::new(ValidatorConfig::default().with_strict(true))
            .validate_str("flow.yml", &yaml)
            .unwrap();
        assert!(!strict.valid);
    }

    #[test]
    fn test_load_errors_propagate() {
        let validator = FlowValidator::default();
        assert!(validator.validate_str("flow.yml", "tasks: [").is_err());
        assert!(validator
            .validate_path(Path::new("/no/such/flow.yml"))
            .is_err());
    }
}
