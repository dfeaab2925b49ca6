//! CLI module.
//!
//! - Argument parsing
//! - Version display
//! - Replaying a recorded stream through the pipeline
//!
//! # Usage
//!
//! ```ignore
//! use artifact_stream::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod replay;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, ReplayArgs, USAGE};
pub use replay::{run_replay, LoggingHandlers};
pub use version::{version_string, VERSION};

use color_eyre::Result;

/// Execute a parsed command, printing results to stdout.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => println!("{}", version_string()),
        CliCommand::Help => println!("{}", USAGE),
        CliCommand::Replay(args) => {
            let files = run_replay(&args).await?;
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
    }
    Ok(())
}
