//! Task list structure and per-task-type rules.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::config::{ValidatorConfig, DEPRECATED_MAX_ATTEMPT_KEY, MAX_ATTEMPTS_KEY};
use super::document::{display_value, value_kind, Document};
use super::report::{CheckResult, ViolationKind};

/// Classification of a task by its `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// A shell script task, which carries extra rules.
    ShellScript,
    Other,
}

impl TaskKind {
    /// Classify a type tag. Matching is by substring, so any type that
    /// contains the marker counts as a shell script task.
    pub fn classify(type_tag: &str, marker: &str) -> Self {
        if !marker.is_empty() && type_tag.contains(marker) {
            TaskKind::ShellScript
        } else {
            TaskKind::Other
        }
    }
}

/// Validate the mandatory, non-empty `tasks` list. Problems in one task never
/// stop the others from being checked.
pub fn check_tasks(doc: &Document, config: &ValidatorConfig) -> CheckResult {
    let mut result = CheckResult::new("tasks", "Validating tasks...");

    // The missing-field error itself belongs to the required fields check.
    let Some(value) = doc.get("tasks") else {
        result.fail(0, ViolationKind::Shape, "tasks", "No tasks defined", "No tasks defined");
        return result;
    };

    let Some(tasks) = value.as_sequence() else {
        result.fail(
            0,
            ViolationKind::Shape,
            "tasks",
            format!("Tasks must be a list, found {}", value_kind(value)),
            "Tasks must be a list",
        );
        return result;
    };

    if tasks.is_empty() {
        let message = "At least one task is required";
        result.fail(0, ViolationKind::Shape, "tasks", message, message);
        return result;
    }

    result.pass(0, format!("Found {} task(s)", tasks.len()));

    for (index, task) in tasks.iter().enumerate() {
        check_task(&mut result, config, index, task);
    }

    if result.ok() {
        result.pass(0, format!("All {} task(s) are valid", tasks.len()));
    } else {
        result.detail(0, format!("Found {} error(s) in tasks", result.errors.len()));
    }

    debug!(
        tasks = tasks.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "tasks checked"
    );
    result
}

fn check_task(result: &mut CheckResult, config: &ValidatorConfig, index: usize, task: &Value) {
    let path = format!("tasks[{index}]");

    let Some(task) = task.as_mapping() else {
        result.detail(1, format!("Validating task: task-{index}"));
        let message = format!("Task {index} must be a mapping");
        result.fail(
            2,
            ViolationKind::Shape,
            &path,
            format!("{message}, found {}", value_kind(task)),
            message,
        );
        return;
    };

    let task_id = task
        .get("id")
        .map(display_value)
        .unwrap_or_else(|| format!("task-{index}"));
    result.detail(1, format!("Validating task: {task_id}"));

    match task.get("id") {
        Some(id) => result.pass(2, format!("Has 'id': {}", display_value(id))),
        None => result.fail(
            2,
            ViolationKind::MissingField,
            format!("{path}.id"),
            format!("Task {index} missing 'id'"),
            "Missing 'id'",
        ),
    }

    let type_tag = match task.get("type") {
        Some(type_tag) => {
            let type_tag = display_value(type_tag);
            result.pass(2, format!("Has 'type': {type_tag}"));
            type_tag
        }
        None => {
            result.fail(
                2,
                ViolationKind::MissingField,
                format!("{path}.type"),
                format!("Task '{task_id}' missing 'type'"),
                "Missing 'type'",
            );
            String::new()
        }
    };

    if TaskKind::classify(&type_tag, &config.script_marker) == TaskKind::ShellScript {
        check_script_task(result, &path, &task_id, task);
    } else if let Some(retry) = task.get("retry").and_then(Value::as_mapping) {
        // Other task types get no retry rules, only the spelling check.
        warn_deprecated_attempts(result, &path, &task_id, retry);
    }
}

fn check_script_task(result: &mut CheckResult, path: &str, task_id: &str, task: &Mapping) {
    if task.contains_key("script") {
        result.pass(2, "Has 'script' field");
    } else {
        result.fail(
            2,
            ViolationKind::MissingField,
            format!("{path}.script"),
            format!("Script task '{task_id}' missing 'script' field"),
            "Missing 'script' field",
        );
    }

    if let Some(retry) = task.get("retry") {
        check_retry(result, path, task_id, retry);
    }

    if let Some(runner) = task.get("taskRunner") {
        if let Some(runner) = nested_mapping(result, path, task_id, "taskRunner", runner) {
            match runner.get("type") {
                Some(t) => result.pass(2, format!("TaskRunner type: {}", display_value(t))),
                None => result.fail(
                    2,
                    ViolationKind::MissingField,
                    format!("{path}.taskRunner.type"),
                    format!("Task '{task_id}' taskRunner missing 'type'"),
                    "TaskRunner missing 'type'",
                ),
            }
        }
    }
}

fn check_retry(result: &mut CheckResult, path: &str, task_id: &str, retry: &Value) {
    let Some(retry) = nested_mapping(result, path, task_id, "retry", retry) else {
        return;
    };

    match retry.get("type") {
        Some(t) => result.pass(2, format!("Retry type: {}", display_value(t))),
        None => result.fail(
            2,
            ViolationKind::MissingField,
            format!("{path}.retry.type"),
            format!("Task '{task_id}' retry missing 'type'"),
            "Retry missing 'type'",
        ),
    }

    if !warn_deprecated_attempts(result, path, task_id, retry) {
        if let Some(attempts) = retry.get(MAX_ATTEMPTS_KEY) {
            result.pass(
                2,
                format!("Has '{MAX_ATTEMPTS_KEY}': {}", display_value(attempts)),
            );
        }
    }
}

/// Warn when a retry policy uses the deprecated attempt count spelling.
/// Returns whether a warning was recorded.
fn warn_deprecated_attempts(
    result: &mut CheckResult,
    path: &str,
    task_id: &str,
    retry: &Mapping,
) -> bool {
    if !retry.contains_key(DEPRECATED_MAX_ATTEMPT_KEY) {
        return false;
    }
    result.warn(
        2,
        ViolationKind::Deprecation,
        format!("{path}.retry.{DEPRECATED_MAX_ATTEMPT_KEY}"),
        format!(
            "Task '{task_id}' retry uses '{DEPRECATED_MAX_ATTEMPT_KEY}', \
             use '{MAX_ATTEMPTS_KEY}' instead"
        ),
        format!(
            "Found '{DEPRECATED_MAX_ATTEMPT_KEY}' \
             (should be '{MAX_ATTEMPTS_KEY}' in latest Kestra)"
        ),
    );
    true
}

/// Return `value` as a mapping, recording a shape error if it is not one.
fn nested_mapping<'a>(
    result: &mut CheckResult,
    path: &str,
    task_id: &str,
    key: &str,
    value: &'a Value,
) -> Option<&'a Mapping> {
    let mapping = value.as_mapping();
    if mapping.is_none() {
        result.fail(
            2,
            ViolationKind::Shape,
            format!("{path}.{key}"),
            format!(
                "Task '{task_id}' {key} must be a mapping, found {}",
                value_kind(value)
            ),
            format!("{key} must be a mapping"),
        );
    }
    mapping
}
