//! CLI argument definitions for `authctl`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use authority_model::DsoType;

#[derive(Parser)]
#[command(
    name = "authctl",
    version,
    about = "Authority control toolkit - resolve metadata values against authority sources",
    long_about = "Resolve user-entered metadata values against configured authority\n\
                  sources (value-pairs lists, controlled vocabularies, registered\n\
                  backends) and inspect the resulting bindings and policies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

#[derive(Subcommand)]
pub enum Command {
    /// Validate the configuration and print registry counts.
    Doctor(SourceArgs),

    /// Query an authority for candidate matches.
    Lookup(LookupArgs),

    /// Reverse-lookup the display label for a stored authority key.
    Label(LabelArgs),
}

/// Where the configuration and form definitions live.
#[derive(Parser)]
pub struct SourceArgs {
    /// Path to the flat configuration TOML.
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the submission-form definitions TOML.
    #[arg(long = "forms", value_name = "PATH")]
    pub forms: PathBuf,
}

#[derive(Parser)]
pub struct LookupArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Metadata field in dotted notation (e.g. dc.subject.srsc).
    #[arg(long = "field", value_name = "FIELD")]
    pub field: String,

    /// Collection handle providing the submission-form context.
    #[arg(long = "collection", value_name = "HANDLE")]
    pub collection: Option<String>,

    /// Object type owning the value.
    #[arg(long = "dso", value_enum, default_value = "item")]
    pub dso: DsoArg,

    /// First result to return.
    #[arg(long = "start", default_value_t = 0)]
    pub start: usize,

    /// Page size (0 for unbounded).
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,

    /// Return the single best match instead of the full page.
    #[arg(long = "best")]
    pub best: bool,

    /// Print the result page as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Query text.
    #[arg(value_name = "QUERY")]
    pub query: String,
}

#[derive(Parser)]
pub struct LabelArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Metadata field in dotted notation.
    #[arg(long = "field", value_name = "FIELD")]
    pub field: String,

    /// Collection handle providing the submission-form context.
    #[arg(long = "collection", value_name = "HANDLE")]
    pub collection: Option<String>,

    /// Object type owning the value.
    #[arg(long = "dso", value_enum, default_value = "item")]
    pub dso: DsoArg,

    /// Stored authority key to resolve.
    #[arg(long = "key", value_name = "KEY")]
    pub key: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DsoArg {
    Item,
    Bitstream,
}

impl From<DsoArg> for DsoType {
    fn from(arg: DsoArg) -> Self {
        match arg {
            DsoArg::Item => DsoType::Item,
            DsoArg::Bitstream => DsoType::Bitstream,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
