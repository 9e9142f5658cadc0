//! Command-line interface for flowlint.
//!
//! Parses arguments, expands directories into flow files, runs the
//! validator and prints text or JSON reports.

mod commands;

pub use commands::{
    collect_flow_files, execute, parse_cli, run, run_with_cli, validate_files, Cli, ColorMode,
    FileOutcome, FlowFiles, OutputFormat,
};
