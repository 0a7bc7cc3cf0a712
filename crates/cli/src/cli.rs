//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// trajstream - stream trajectory frames into analysis consumers
#[derive(Parser, Debug)]
#[command(
    name = "trajstream",
    author,
    version,
    about = "Trajectory streaming pipeline",
    long_about = "Reads molecular dynamics trajectory files frame by frame, selects a \n\
                  sub-range with an optional stride, and fans every selected frame out \n\
                  to the configured analysis consumers."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TRAJSTREAM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "TRAJSTREAM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline
    Run(RunArgs),

    /// Validate an options file without running
    Validate(ValidateArgs),

    /// Display the resolved configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to options file (TOML or JSON)
    #[arg(short, long, default_value = "trajstream.toml", env = "TRAJSTREAM_CONFIG")]
    pub config: PathBuf,

    /// Override channel capacity
    #[arg(long, env = "TRAJSTREAM_BUFFER_SIZE")]
    pub buffer_size: Option<usize>,

    /// Override stride over absolute frames
    #[arg(long)]
    pub skip: Option<i64>,

    /// Override first frame to accept
    #[arg(long)]
    pub first_frame: Option<i64>,

    /// Override last frame to read
    #[arg(long)]
    pub last_frame: Option<i64>,

    /// Override first time to accept (ps)
    #[arg(long)]
    pub first_time: Option<f64>,

    /// Override last time to read (ps)
    #[arg(long)]
    pub last_time: Option<f64>,

    /// Override log interval (0 = off)
    #[arg(long)]
    pub log_interval: Option<u64>,

    /// Resolve the configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRAJSTREAM_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to options file to validate
    #[arg(short, long, default_value = "trajstream.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to options file
    #[arg(short, long, default_value = "trajstream.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show consumer configuration
    #[arg(long)]
    pub consumers: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
