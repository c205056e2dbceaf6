//! Command-line interface for the audience engine's offline tooling.
//!
//! Each subcommand layers its options from CLI flags, `AUDIENCE_*`
//! environment variables, and configuration files before running.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod export;
mod replay;
mod segments;

pub use error::CliError;

use export::{ExportArgs, run_export};
use replay::{ReplayArgs, run_replay_with};
use segments::{SegmentsArgs, run_segments_with};

pub(crate) const ARG_PRIORS: &str = "priors";
pub(crate) const ARG_REPLAY_SESSION: &str = "session";
pub(crate) const ARG_REPLAY_USER: &str = "user";
pub(crate) const ARG_EXPORT_OUTPUT: &str = "output";
pub(crate) const ENV_REPLAY_SESSION: &str = "AUDIENCE_CMDS_REPLAY_SESSION";
pub(crate) const ENV_EXPORT_OUTPUT: &str = "AUDIENCE_CMDS_EXPORT_PRIORS_OUTPUT";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, or when
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Segments(args) => run_segments_with(args, writer),
        Command::Replay(args) => run_replay_with(args, writer),
        Command::ExportPriors(args) => run_export(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "audience",
    about = "Offline utilities for the audience interest engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the segment prior scores for a set of demographic tags.
    Segments(SegmentsArgs),
    /// Replay recorded logins and events, then print interest profiles.
    Replay(ReplayArgs),
    /// Write the built-in prior table as a JSON artefact.
    ExportPriors(ExportArgs),
}

/// Pretty-print `value` as JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
