//! Text and JSON rendering of validation reports.
//!
//! Colouring is a pure function of the message and its marker; nothing here
//! keeps process-wide state.

use std::path::Path;

use serde::Serialize;

use crate::error::FlowError;
use crate::validation::{FlowReport, Marker, Severity, TranscriptLine, Violation, ViolationKind};

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

const RULE_WIDTH: usize = 60;

/// Wrap `text` in the ANSI colour for `marker`. Returns `text` unchanged when
/// `color` is false or the marker has no colour.
pub fn paint(text: &str, marker: Marker, color: bool) -> String {
    let code = match marker {
        Marker::Pass => GREEN,
        Marker::Fail => RED,
        Marker::Warn => YELLOW,
        Marker::Info | Marker::Section => BLUE,
        Marker::Detail => "",
    };
    if !color || code.is_empty() {
        return text.to_string();
    }
    format!("{code}{text}{RESET}")
}

fn symbol(marker: Marker) -> Option<&'static str> {
    match marker {
        Marker::Pass => Some("✓"),
        Marker::Fail => Some("✗"),
        Marker::Warn => Some("⚠"),
        Marker::Info => Some("ℹ"),
        Marker::Section | Marker::Detail => None,
    }
}

/// Render one transcript line, without a trailing newline.
pub fn render_line(line: &TranscriptLine, color: bool) -> String {
    let indent = "  ".repeat(line.indent);
    match line.marker {
        Marker::Section => format!("\n{}", paint(&line.text, Marker::Section, color)),
        Marker::Detail => format!("{indent}{}", line.text),
        marker => {
            let sym = symbol(marker).unwrap_or_default();
            format!("{indent}{} {}", paint(sym, marker, color), line.text)
        }
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Join rendered lines, each terminated by a newline.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn banner(path: &Path, color: bool) -> Vec<String> {
    vec![
        String::new(),
        rule(),
        paint(
            &format!("Validating Kestra Flow: {}", path.display()),
            Marker::Section,
            color,
        ),
        rule(),
    ]
}

/// Render the full human-readable transcript for a loaded flow.
pub fn render_text(report: &FlowReport, color: bool) -> String {
    let mut lines = banner(&report.path, color);

    let syntax = [
        TranscriptLine {
            marker: Marker::Section,
            indent: 0,
            text: "Checking YAML syntax...".to_string(),
        },
        TranscriptLine {
            marker: Marker::Pass,
            indent: 0,
            text: "YAML syntax is valid".to_string(),
        },
    ];
    let transcript = report.checks.iter().flat_map(|check| &check.transcript);
    lines.extend(
        syntax
            .iter()
            .chain(transcript)
            .map(|line| render_line(line, color)),
    );

    let summary = format!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );

    lines.push(String::new());
    lines.push(rule());
    if report.valid {
        lines.push(paint("✓ VALIDATION PASSED", Marker::Pass, color));
        lines.push(summary);
        lines.extend(
            [
                "",
                "The YAML file is valid and ready to import into Kestra!",
                "",
                "To import:",
                "  1. Open the Kestra UI (http://localhost:8080)",
                "  2. Go to Flows",
                "  3. Click 'Create' or 'Import'",
                "  4. Paste the YAML content",
            ]
            .map(String::from),
        );
    } else {
        lines.push(paint("✗ VALIDATION FAILED", Marker::Fail, color));
        lines.push(summary);
        if report.strict && report.error_count() == 0 {
            lines.push(String::new());
            lines.push("Warnings are treated as errors (strict mode).".to_string());
        }
        lines.push(String::new());
        lines.push("Please fix the errors above before importing to Kestra.".to_string());
    }
    lines.push(rule());
    finish(lines)
}

/// Render a flow that could not be loaded. No checks ran.
pub fn render_load_failure(path: &Path, err: &FlowError, color: bool) -> String {
    let mut lines = banner(path, color);
    // Only files that were actually read get a syntax section.
    if !matches!(err, FlowError::NotFound(_) | FlowError::Walk { .. }) {
        lines.push(String::new());
        lines.push(paint("Checking YAML syntax...", Marker::Section, color));
    }
    lines.push(format!("{} {}", paint("✗", Marker::Fail, color), err));
    finish(lines)
}

/// A violation tagged with its severity, as emitted in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct JsonViolation<'a> {
    pub severity: Severity,
    pub kind: ViolationKind,
    pub field: &'a str,
    pub message: &'a str,
}

/// Per-file entry of the JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileReport<'a> {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<JsonLoadError>,
    pub errors: Vec<JsonViolation<'a>>,
    pub warnings: Vec<JsonViolation<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonLoadError {
    pub kind: &'static str,
    pub message: String,
}

/// Top level of the JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub valid: bool,
    pub files: Vec<JsonFileReport<'a>>,
}

fn tag(severity: Severity, violation: &Violation) -> JsonViolation<'_> {
    JsonViolation {
        severity,
        kind: violation.kind,
        field: &violation.field,
        message: &violation.message,
    }
}

impl<'a> JsonFileReport<'a> {
    pub fn from_report(report: &'a FlowReport) -> Self {
        Self {
            path: report.path.display().to_string(),
            valid: report.valid,
            load_error: None,
            errors: report.errors().map(|v| tag(Severity::Error, v)).collect(),
            warnings: report.warnings().map(|v| tag(Severity::Warning, v)).collect(),
        }
    }

    pub fn from_load_error(path: &Path, err: &FlowError) -> Self {
        Self {
            path: path.display().to_string(),
            valid: false,
            load_error: Some(JsonLoadError {
                kind: err.kind(),
                message: err.to_string(),
            }),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
