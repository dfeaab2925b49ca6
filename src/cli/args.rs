//! Command-line argument parsing.
//!
//! This module parses arguments for the replay binary and determines which
//! command to execute.

use std::path::PathBuf;

use thiserror::Error;

/// Default replay chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 24;

/// Default pause between replayed chunks.
pub const DEFAULT_DELAY_MS: u64 = 5;

/// Options for replaying a recorded stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayArgs {
    /// File to replay; stdin when absent
    pub input: Option<PathBuf>,
    pub chunk_size: usize,
    pub delay_ms: u64,
    /// Overrides the configured settling window
    pub settle_ms: Option<u64>,
}

impl Default for ReplayArgs {
    fn default() -> Self {
        Self {
            input: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            delay_ms: DEFAULT_DELAY_MS,
            settle_ms: None,
        }
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Replay a stream through the pipeline (default)
    Replay(ReplayArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid value `{value}` for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("unexpected argument {0}")]
    UnexpectedArgument(String),
}

pub const USAGE: &str = "\
Usage: artifact-stream [OPTIONS] [INPUT]

Replays INPUT (or stdin) through the artifact parser in small chunks and
prints the final file list as JSON.

Options:
  --chunk-size <N>   bytes per replayed chunk (default 24)
  --delay-ms <N>     pause before each chunk in milliseconds (default 5)
  --settle-ms <N>    content commit settling window in milliseconds
  -h, --help         show this help
  -V, --version      show version";

/// Parse command-line arguments, skipping the program name.
///
/// # Examples
///
/// ```
/// use artifact_stream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["artifact-stream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut replay = ReplayArgs::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--chunk-size" => replay.chunk_size = parse_value(&arg, args.next())?,
            "--delay-ms" => replay.delay_ms = parse_value(&arg, args.next())?,
            "--settle-ms" => replay.settle_ms = Some(parse_value(&arg, args.next())?),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(ArgsError::UnknownOption(flag.to_string()))
            }
            _ if replay.input.is_some() => return Err(ArgsError::UnexpectedArgument(arg)),
            "-" => {}
            _ => replay.input = Some(PathBuf::from(arg)),
        }
    }

    if replay.chunk_size == 0 {
        return Err(ArgsError::InvalidValue {
            flag: "--chunk-size".to_string(),
            value: "0".to_string(),
        });
    }
    Ok(CliCommand::Replay(replay))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, ArgsError> {
    let value = value.ok_or_else(|| ArgsError::MissingValue(flag.to_string()))?;
    value.parse().map_err(|_| ArgsError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}
