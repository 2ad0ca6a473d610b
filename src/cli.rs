// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `dagexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagexec",
    version,
    about = "Run shell commands as a dependency graph on a fixed worker pool.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Dagexec.toml")]
    pub config: String,

    /// Number of workers; overrides `[config].workers`.
    ///
    /// Values below 1 are treated as 1.
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the pipeline and print the dispatch order without running it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
