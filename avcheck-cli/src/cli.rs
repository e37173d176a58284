// avcheck-cli/src/cli.rs
//
// Defines the command-line argument structures using clap. Every flag is
// optional: running `avcheck` with no arguments performs the full probe.

use avcheck_core::config::{
    DEFAULT_DEMUXER, DEFAULT_EXEC_TIMEOUT_SECS, DEFAULT_OPEN_TIMEOUT_SECS,
};
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "avcheck: Media runtime capability probe",
    long_about = "Verifies that the FFmpeg runtime loads, lists common codecs and formats, \
                  provides the expected streaming demuxer and can open a remote stream over HTTPS."
)]
pub struct Cli {
    /// Remote stream to open during the secure remote-open check
    #[arg(long, value_name = "URL", env = "AVCHECK_URL")]
    pub url: Option<String>,

    /// Skip the remote-open check (no network access)
    #[arg(long)]
    pub offline: bool,

    /// Demuxer that must be listed by the engine
    #[arg(long, value_name = "NAME", env = "AVCHECK_DEMUXER", default_value = DEFAULT_DEMUXER)]
    pub demuxer: String,

    /// Seconds allowed for opening the remote stream
    #[arg(
        long,
        value_name = "SECS",
        env = "AVCHECK_TIMEOUT",
        default_value_t = DEFAULT_OPEN_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Seconds allowed for each local ffmpeg/ffprobe invocation
    #[arg(
        long,
        value_name = "SECS",
        env = "AVCHECK_EXEC_TIMEOUT",
        default_value_t = DEFAULT_EXEC_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub exec_timeout: u64,

    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH", env = "AVCHECK_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe executable (defaults to the one next to --ffmpeg)
    #[arg(long, value_name = "PATH", env = "AVCHECK_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    /// Comma-separated reference codecs to report (e.g., h264,aac)
    #[arg(long, value_delimiter = ',', value_name = "CODECS")]
    pub codecs: Option<Vec<String>>,

    /// Report format written to stdout
    #[arg(long, value_enum, env = "AVCHECK_FORMAT", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write debug-level logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Report formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One marked line per check
    Text,
    /// Line-delimited key=value records
    Kv,
    /// A single JSON document
    Json,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn parse_cli_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}
