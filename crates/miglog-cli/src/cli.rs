//! CLI argument definitions for the migration log triage tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "miglog",
    version,
    about = "Migration log triage - turn run errors into mapping ignore rules",
    long_about = "Post-process a data-migration run log.\n\n\
                  Scans the log for unmapped documents and fields, appends matching\n\
                  <ignore> rules to the mapping documents, and queues a review ticket\n\
                  for every batch of ignored entities."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Patch mapping documents and queue review tickets from a run log.
    Run(RunArgs),

    /// Classify a run log without touching any mapping document.
    Scan(ScanArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Migration directory holding the run log and mapping documents.
    #[arg(value_name = "MIGRATION_DIR")]
    pub migration_dir: PathBuf,

    /// Path to the run log (default: <MIGRATION_DIR>/dataMigration.log).
    #[arg(long = "migration-log", value_name = "PATH")]
    pub migration_log: Option<PathBuf>,

    /// Directory holding map.xml and map-eav.xml (default: MIGRATION_DIR).
    #[arg(long = "map-dir", value_name = "DIR")]
    pub map_dir: Option<PathBuf>,

    /// Classify and patch in memory without writing mapping documents.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write queued review tickets to a JSON file.
    #[arg(long = "tickets-json", value_name = "PATH")]
    pub tickets_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Migration directory holding the run log.
    #[arg(value_name = "MIGRATION_DIR")]
    pub migration_dir: PathBuf,

    /// Path to the run log (default: <MIGRATION_DIR>/dataMigration.log).
    #[arg(long = "migration-log", value_name = "PATH")]
    pub migration_log: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
