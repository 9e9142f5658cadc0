//! Naming conventions for the flow identifier and namespace.

use tracing::debug;

use super::document::Document;
use super::report::{CheckResult, ViolationKind};

/// A namespace with a path separator only warns. An identifier with
/// whitespace is an error since ids are used as path-safe tokens.
pub fn check_conventions(doc: &Document) -> CheckResult {
    let mut result = CheckResult::new("conventions", "Checking Kestra-specific syntax...");

    let namespace = doc.text("namespace");
    if namespace.contains(|c: char| c == '/' || c == '\\') {
        result.warn(
            0,
            ViolationKind::Convention,
            "namespace",
            format!("Namespace '{namespace}' contains path separators"),
            format!(
                "Namespace '{namespace}' contains path separators. Should be a simple identifier."
            ),
        );
    } else {
        result.pass(0, format!("Namespace format looks good: {namespace}"));
    }

    let flow_id = doc.text("id");
    if flow_id.chars().any(char::is_whitespace) {
        result.fail(
            0,
            ViolationKind::Convention,
            "id",
            format!("Flow ID '{flow_id}' contains whitespace"),
            format!("Flow ID '{flow_id}' contains spaces. Use dashes or underscores."),
        );
    } else {
        result.pass(0, format!("Flow ID format looks good: {flow_id}"));
    }

    debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "conventions checked"
    );
    result
}
