//! Input and output declarations.
//!
//! Both sections are optional lists of mappings. They share one rule with a
//! different set of required keys.

use serde_yaml::Value;
use tracing::debug;

use super::document::{display_value, value_kind, Document};
use super::report::{CheckResult, ViolationKind};

/// Placeholder name for a declaration that has no `id`.
const UNKNOWN_ID: &str = "unknown";

struct Section {
    key: &'static str,
    label: &'static str,
    required: &'static [&'static str],
}

const INPUTS: Section = Section {
    key: "inputs",
    label: "Input",
    required: &["id", "type"],
};

const OUTPUTS: Section = Section {
    key: "outputs",
    label: "Output",
    required: &["id", "type", "value"],
};

/// Validate the optional `inputs` list. Each entry needs `id` and `type`.
pub fn check_inputs(doc: &Document) -> CheckResult {
    check_section(doc, &INPUTS)
}

/// Validate the optional `outputs` list. Each entry needs `id`, `type` and
/// `value`.
pub fn check_outputs(doc: &Document) -> CheckResult {
    check_section(doc, &OUTPUTS)
}

fn check_section(doc: &Document, section: &Section) -> CheckResult {
    let mut result = CheckResult::new(section.key, format!("Validating {}...", section.key));

    let Some(value) = doc.get(section.key) else {
        result.info(0, format!("No {} defined (optional)", section.key));
        return result;
    };

    let Some(entries) = value.as_sequence() else {
        let message = format!("{} must be a list", capitalize(section.key));
        result.fail(
            0,
            ViolationKind::Shape,
            section.key,
            format!("{message}, found {}", value_kind(value)),
            message,
        );
        return result;
    };

    let noun = section.key.trim_end_matches('s');
    result.pass(0, format!("Found {} {noun}(s)", entries.len()));

    for (index, entry) in entries.iter().enumerate() {
        check_entry(&mut result, section, index, entry);
    }

    debug!(
        section = section.key,
        entries = entries.len(),
        errors = result.errors.len(),
        "declarations checked"
    );
    result
}

fn check_entry(result: &mut CheckResult, section: &Section, index: usize, entry: &Value) {
    let path = format!("{}[{}]", section.key, index);

    let Some(map) = entry.as_mapping() else {
        let message = format!("{} {} must be a mapping", section.label, index);
        result.fail(
            1,
            ViolationKind::Shape,
            &path,
            format!("{message}, found {}", value_kind(entry)),
            message,
        );
        return;
    };

    let id = map
        .get("id")
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN_ID.to_string());

    let mut complete = true;
    for key in section.required {
        if map.contains_key(*key) {
            continue;
        }
        complete = false;
        let text = if *key == "id" {
            format!("{} missing 'id'", section.label)
        } else {
            format!("{} '{}' missing '{}'", section.label, id, key)
        };
        result.fail(
            1,
            ViolationKind::MissingField,
            format!("{path}.{key}"),
            &text,
            &text,
        );
    }

    if complete {
        let type_tag = map.get("type").map(display_value).unwrap_or_default();
        result.pass(1, format!("{} '{}' (type: {})", section.label, id, type_tag));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
