// src/cli/handlers/commons.rs

// Shared plumbing for the command handlers.

use crate::{core::bridge::CommandBridge, models::Outcome};
use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use std::{fmt, sync::Arc};
use thiserror::Error;

/// How outcomes are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain data on stdout; failures go to stderr through `main`.
    Text,
    /// One `{"success": ...}` object per command.
    Json,
}

/// Everything a handler needs: the configured bridge and the output format.
#[derive(Debug, Clone)]
pub struct Session {
    /// The bridge every handler calls into.
    pub bridge: Arc<CommandBridge>,
    /// How results are printed.
    pub format: OutputFormat,
}

/// A failure that was already printed (as JSON) and only needs a non-zero exit code.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ReportedFailure(pub String);

/// Parses a handler's arguments with its own clap definition.
///
/// `--help` and usage errors are printed by clap, which then exits.
pub fn parse_args<T: Parser>(command: &str, args: Vec<String>) -> T {
    T::try_parse_from(std::iter::once(command.to_string()).chain(args))
        .unwrap_or_else(|e| e.exit())
}

/// Prints an outcome in the session's format.
///
/// In text mode a failure becomes the returned error, so `main` prints it.
pub fn report<T>(outcome: Outcome<T>, format: OutputFormat) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&outcome)?);
            match outcome {
                Outcome::Success(_) => Ok(()),
                Outcome::Failure(message) => Err(ReportedFailure(message).into()),
            }
        }
        OutputFormat::Text => match outcome {
            Outcome::Success(data) => {
                println!("{}", data.to_string().trim_end());
                Ok(())
            }
            Outcome::Failure(message) => Err(anyhow!(message)),
        },
    }
}
