//! Required top-level fields.

use tracing::debug;

use super::config::REQUIRED_FIELDS;
use super::document::Document;
use super::report::{CheckResult, ViolationKind};

/// Check that `id`, `namespace` and `tasks` are all present. Every missing
/// field is reported.
pub fn check_required_fields(doc: &Document) -> CheckResult {
    let mut result = CheckResult::new("required_fields", "Checking required fields...");

    for field in REQUIRED_FIELDS {
        if doc.contains(field) {
            result.pass(0, format!("Found required field: {field}"));
        } else {
            let message = format!("Missing required field: {field}");
            result.fail(0, ViolationKind::MissingField, field, &message, &message);
        }
    }

    debug!(missing = result.errors.len(), "required fields checked");
    result
}
