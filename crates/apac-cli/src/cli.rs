//! CLI argument definitions for the remittance generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "apac-remessa",
    version,
    about = "APAC remittance generator - build fixed-width SIA/SUS batch files",
    long_about = "Build an APAC remittance file from a patient extract.\n\n\
                  Each patient takes one pre-issued authorization number from the\n\
                  number pool file; unused numbers are written back to it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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

    /// Allow patient names and other row values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a remittance file for one competence period.
    Generate(GenerateArgs),

    /// Show how many authorization numbers a pool file still holds.
    Numbers(NumbersArgs),

    /// Check a remittance file's framing, lengths, count and control field.
    Verify(VerifyArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Patient extract (`;`-separated CSV).
    #[arg(value_name = "PATIENTS")]
    pub patients: PathBuf,

    /// Authorization number pool file.
    #[arg(long = "numbers", value_name = "FILE")]
    pub numbers: PathBuf,

    /// Physician reference table (`nome_completo`, `cartao_sus`).
    #[arg(long = "physicians", value_name = "FILE")]
    pub physicians: PathBuf,

    /// Facility reference table (`desc_solicitante`, `cod_solicitante`).
    #[arg(long = "facilities", value_name = "FILE")]
    pub facilities: PathBuf,

    /// Competence period as YYYYMM.
    #[arg(long = "period", value_name = "YYYYMM")]
    pub period: String,

    /// Layout version written to the header (default 03.18).
    #[arg(long = "layout-version", value_name = "NN.NN")]
    pub layout_version: Option<String>,

    /// Output directory (default: the patient extract's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON file overriding the institution profile.
    #[arg(long = "profile", value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Skip the timestamped copy of the pool file.
    #[arg(long = "no-backup")]
    pub no_backup: bool,

    /// Assemble and summarise without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with status 2 when any patient row was skipped.
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct NumbersArgs {
    /// Authorization number pool file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct VerifyArgs {
    /// Remittance file to check.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
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
