//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pofatu_standards::ERRATA_ENV_VAR;

#[derive(Parser)]
#[command(
    name = "pofatu",
    version,
    about = "Pofatu dataset tools - build and check archaeological provenance data",
    long_about = "Build typed records from the Pofatu dataset workbook.\n\n\
                  Reads the five workbook sheets (flattened to CSV on first use),\n\
                  merges duplicate rows and checks citations against the bibliography."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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

/// Where the dataset lives and how it is read.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Repository directory holding the workbook and the bibliography.
    #[arg(
        long,
        value_name = "DIR",
        env = "POFATU_REPOS",
        default_value = ".",
        global = true
    )]
    pub repos: PathBuf,

    /// Errata file replacing the built-in corrections.
    #[arg(long, value_name = "FILE", env = ERRATA_ENV_VAR, global = true)]
    pub errata: Option<PathBuf>,

    /// Reject values outside the controlled vocabularies.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build entities and print them.
    Dump(DumpArgs),

    /// Check citations, analyses and methods for consistency.
    Check(CheckArgs),

    /// Print entity counts.
    Stats(StatsArgs),

    /// Write the workbook sheets as CSV files.
    Flatten,
}

#[derive(Debug, Clone, Args)]
pub struct DumpArgs {
    /// Entities to print.
    #[arg(long, value_enum, default_value = "all")]
    pub entity: EntityArg,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Bibliography file (default: <REPOS>/POFATU-references.bib).
    #[arg(long, value_name = "FILE")]
    pub bib: Option<PathBuf>,

    /// Stop at the first problem instead of reporting all of them.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Print counts as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Entity kinds for `dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    All,
    Contributions,
    References,
    Methods,
    Samples,
    Analyses,
    /// One line per measurement, rendered as text.
    Measurements,
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
