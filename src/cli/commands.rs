//! CLI definition and command handling for flowlint.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::FlowError;
use crate::render::{render_load_failure, render_text, JsonFileReport, JsonOutput};
use crate::validation::config::DEFAULT_SCRIPT_MARKER;
use crate::validation::{FlowReport, FlowValidator, ValidatorConfig};

/// File extensions picked up when a directory is given.
const FLOW_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Validate Kestra flow YAML files against schema requirements.
#[derive(Parser, Debug)]
#[command(name = "flowlint")]
#[command(about = "Validate Kestra flow YAML files against schema requirements")]
#[command(version)]
#[command(
    long_about = "flowlint checks Kestra flow definitions for required fields, task structure,\ninput/output declarations and naming conventions.\n\nExample usage:\n  flowlint flows/simple-builder-v2.yml\n  flowlint --format json flows/"
)]
pub struct Cli {
    /// Flow files or directories to validate.
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "FLOWLINT_FORMAT")]
    pub format: OutputFormat,

    /// When to colour text output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Treat warnings as errors.
    #[arg(long, env = "FLOWLINT_STRICT")]
    pub strict: bool,

    /// Task type substring that marks a shell script task.
    #[arg(long, default_value = DEFAULT_SCRIPT_MARKER)]
    pub script_marker: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a yes/no decision. `Auto` colours only a terminal stdout
    /// with `NO_COLOR` unset.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

impl Cli {
    /// Validator configuration derived from the flags.
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig::new()
            .with_script_marker(self.script_marker.clone())
            .with_strict(self.strict)
    }
}

/// Outcome of validating one file.
#[derive(Debug)]
pub enum FileOutcome {
    Checked(FlowReport),
    LoadFailed { path: PathBuf, error: FlowError },
}

impl FileOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, FileOutcome::Checked(report) if report.valid)
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub fn run() -> anyhow::Result<ExitCode> {
    run_with_cli(parse_cli())
}

/// Run the CLI with the parsed arguments.
///
/// Exits with 0 when every flow passes and 1 otherwise, including when no
/// path was given.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    Ok(if execute(cli)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Validate every flow named on the command line and print the reports.
/// Returns whether all of them passed.
pub fn execute(cli: Cli) -> anyhow::Result<bool> {
    if cli.paths.is_empty() {
        Cli::command().print_help()?;
        println!("\nExample:\n  flowlint flows/simple-builder-v2.yml");
        return Ok(false);
    }

    let found = collect_flow_files(&cli.paths);
    if found.is_empty() {
        warn!(paths = ?cli.paths, "no flow files found");
        println!("No flow files (*.yml, *.yaml) found in the given paths");
        return Ok(false);
    }

    let validator = FlowValidator::new(cli.validator_config());
    let mut outcomes = validate_files(&validator, &found.files);
    outcomes.extend(found.unreadable);
    let all_passed = outcomes.iter().all(FileOutcome::passed);

    match cli.format {
        OutputFormat::Text => print_text(&outcomes, cli.color.enabled()),
        OutputFormat::Json => print_json(&outcomes, all_passed)?,
    }

    Ok(all_passed)
}

/// Validate each file independently. A load failure in one file does not
/// stop the others.
pub fn validate_files(validator: &FlowValidator, files: &[PathBuf]) -> Vec<FileOutcome> {
    files
        .iter()
        .map(|path| match validator.validate_path(path) {
            Ok(report) => FileOutcome::Checked(report),
            Err(error) => {
                debug!(path = %path.display(), kind = error.kind(), "flow failed to load");
                FileOutcome::LoadFailed {
                    path: path.clone(),
                    error,
                }
            }
        })
        .collect()
}

/// Flow files found on the command line, plus directory entries that could
/// not be read while walking.
#[derive(Debug, Default)]
pub struct FlowFiles {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<FileOutcome>,
}

impl FlowFiles {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.unreadable.is_empty()
    }
}

/// Expand the given paths: files are kept as given (even if missing, so the
/// validator reports them), directories are walked for YAML files in sorted
/// order. Symlinks are followed. An entry the walk cannot read becomes a
/// failed outcome of its own and the walk continues.
pub fn collect_flow_files(paths: &[PathBuf]) -> FlowFiles {
    let mut found = FlowFiles::default();
    for path in paths {
        if !path.is_dir() {
            found.files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_flow_file(entry.path()) {
                        found.files.push(entry.into_path());
                    }
                }
                Err(source) => {
                    let failed = source.path().unwrap_or(path.as_path()).to_path_buf();
                    warn!(path = %failed.display(), error = %source, "skipping unreadable entry");
                    found.unreadable.push(FileOutcome::LoadFailed {
                        path: failed.clone(),
                        error: FlowError::Walk {
                            path: failed,
                            source,
                        },
                    });
                }
            }
        }
    }
    found
}

fn is_flow_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FLOW_EXTENSIONS.contains(&ext))
}

fn print_text(outcomes: &[FileOutcome], color: bool) {
    for outcome in outcomes {
        match outcome {
            FileOutcome::Checked(report) => print!("{}", render_text(report, color)),
            FileOutcome::LoadFailed { path, error } => {
                print!("{}", render_load_failure(path, error, color))
            }
        }
    }

    if outcomes.len() > 1 {
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        println!("\n{} of {} flow(s) passed", passed, outcomes.len());
    }
}

fn print_json(outcomes: &[FileOutcome], all_passed: bool) -> anyhow::Result<()> {
    let output = JsonOutput {
        valid: all_passed,
        files: outcomes
            .iter()
            .map(|outcome| match outcome {
                FileOutcome::Checked(report) => JsonFileReport::from_report(report),
                FileOutcome::LoadFailed { path, error } => {
                    JsonFileReport::from_load_error(path, error)
                }
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["flowlint", "flow.yml"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("flow.yml")]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.color, ColorMode::Auto);
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.validator_config(), ValidatorConfig::default());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "flowlint",
            "--format",
            "json",
            "--color",
            "never",
            "--strict",
            "--script-marker",
            "python.Script",
            "a.yml",
            "b.yaml",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.color.enabled());
        assert_eq!(cli.paths.len(), 2);
        let config = cli.validator_config();
        assert!(config.strict);
        assert_eq!(config.script_marker, "python.Script");
    }

    #[test]
    fn test_no_paths_fails() {
        let cli = Cli::try_parse_from(["flowlint"]).unwrap();
        assert!(!execute(cli).unwrap());
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli =
            Cli::try_parse_from([std::ffi::OsStr::new("flowlint"), dir.path().as_os_str()])
                .unwrap();
        assert!(!execute(cli).unwrap());
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.yml"), "id: b").unwrap();
        fs::write(dir.path().join("a.yaml"), "id: a").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("nested").join("c.yml"), "id: c").unwrap();

        let found = collect_flow_files(&[dir.path().to_path_buf()]);
        assert!(found.unreadable.is_empty());
        let names: Vec<String> = found
            .files
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "nested/c.yml"]);
    }

    #[test]
    fn test_collect_keeps_missing_files() {
        let found = collect_flow_files(&[PathBuf::from("/no/such/flow.yml")]);
        assert_eq!(found.files, vec![PathBuf::from("/no/such/flow.yml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_follows_symlinked_flows() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, "id: linked").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.yml")).unwrap();

        let found = collect_flow_files(&[dir.path().to_path_buf()]);
        assert_eq!(found.files, vec![dir.path().join("linked.yml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_does_not_stop_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("good.yml"),
            "id: ok\nnamespace: team\ntasks:\n  - id: t\n    type: io.kestra.plugin.core.log.Log\n",
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.yml"), dir.path().join("dangling.yml"))
            .unwrap();

        let found = collect_flow_files(&[dir.path().to_path_buf()]);
        assert_eq!(found.files, vec![dir.path().join("good.yml")]);
        assert_eq!(found.unreadable.len(), 1);
        assert!(matches!(
            &found.unreadable[0],
            FileOutcome::LoadFailed { error: FlowError::Walk { .. }, .. }
        ));

        let cli = Cli::try_parse_from([
            std::ffi::OsStr::new("flowlint"),
            std::ffi::OsStr::new("--color"),
            std::ffi::OsStr::new("never"),
            dir.path().as_os_str(),
        ])
        .unwrap();
        assert!(!execute(cli).unwrap());
    }

    fn exit_code_of(args: &[&std::ffi::OsStr]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        format!("{:?}", run_with_cli(cli).unwrap())
    }

    #[test]
    fn test_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let valid = dir.path().join("valid.yml");
        fs::write(
            &valid,
            "id: ok\nnamespace: team\ntasks:\n  - id: t\n    type: io.kestra.plugin.scripts.shell.Script\n    script: echo hi\n",
        )
        .unwrap();
        let invalid = dir.path().join("invalid.yml");
        fs::write(&invalid, "id: not ok\nnamespace: team\ntasks: []\n").unwrap();

        let flowlint = std::ffi::OsStr::new("flowlint");
        let never = [std::ffi::OsStr::new("--color"), std::ffi::OsStr::new("never")];
        let success = format!("{:?}", ExitCode::SUCCESS);
        let failure = format!("{:?}", ExitCode::from(1));

        assert_eq!(
            exit_code_of(&[flowlint, never[0], never[1], valid.as_os_str()]),
            success
        );
        assert_eq!(
            exit_code_of(&[flowlint, never[0], never[1], invalid.as_os_str()]),
            failure
        );
        assert_eq!(
            exit_code_of(&[flowlint, valid.as_os_str(), invalid.as_os_str()]),
            failure
        );
        assert_eq!(exit_code_of(&[flowlint]), failure);
    }

    #[test]
    fn test_validate_files_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.yml");
        fs::write(
            &good,
            "id: ok\nnamespace: team\ntasks:\n  - id: t\n    type: io.kestra.plugin.core.log.Log\n",
        )
        .unwrap();
        let missing = dir.path().join("missing.yml");

        let outcomes = validate_files(&FlowValidator::default(), &[missing, good]);
        assert!(matches!(outcomes[0], FileOutcome::LoadFailed { .. }));
        assert!(outcomes[1].passed());
    }
}
