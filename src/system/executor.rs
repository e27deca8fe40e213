// src/system/executor.rs

use crate::models::{ArgumentVector, ProcessResult};
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvocationError {
    /// The executable could not be started (missing, not executable, ...).
    #[error("Command '{command}' could not be executed: {source}")]
    Spawn {
        /// The command line, for messages.
        command: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The process ran but did not exit successfully.
    #[error("Command '{command}' exited with a non-zero error code ({}).", describe_code(.exit_code))]
    NonZeroExit {
        /// The command line, for messages.
        command: String,
        /// `None` when the process was killed by a signal.
        exit_code: Option<i32>,
        /// What the process wrote to stdout.
        stdout: String,
        /// What the process wrote to stderr.
        stderr: String,
    },
}

impl InvocationError {
    /// The captured stderr, if the process ran and wrote anything to it.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }

    /// The stdout captured before the process failed.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stdout, .. } => Some(stdout),
            Self::Spawn { .. } => None,
        }
    }

    /// The exit code, if the process ran and exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { exit_code, .. } => *exit_code,
            Self::Spawn { .. } => None,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "terminated by signal".to_string(), |c| format!("status {c}"))
}

/// Runs the node executable to completion and captures what it printed.
pub trait ProcessInvoker: Send + Sync {
    /// Blocks until the process exits. A non-zero exit is an error that still
    /// carries both captured streams.
    fn invoke(&self, program: &Path, argv: &ArgumentVector) -> Result<ProcessResult, InvocationError>;
}

/// The real invoker, backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInvoker;

impl ProcessInvoker for SystemInvoker {
    fn invoke(&self, program: &Path, argv: &ArgumentVector) -> Result<ProcessResult, InvocationError> {
        let program = dunce::simplified(program);
        let command_line = format!("{} {}", program.display(), argv);
        log::debug!("Invoking: {}", command_line);

        // stdin is closed so the node can never block waiting for a terminal.
        let output = StdCommand::new(program)
            .args(argv.as_slice())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| InvocationError::Spawn {
                command: command_line.clone(),
                source: e,
            })?;

        let result = ProcessResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::trace!(
            "'{}' finished with {:?} ({} bytes stdout, {} bytes stderr)",
            command_line,
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );

        if !output.status.success() {
            return Err(InvocationError::NonZeroExit {
                command: command_line,
                exit_code: result.exit_code,
                stdout: result.stdout,
                stderr: result.stderr,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_is_exposed_only_when_present() {
        let failed = InvocationError::NonZeroExit {
            command: "node send".to_string(),
            exit_code: Some(1),
            stdout: "partial".to_string(),
            stderr: "insufficient funds\n".to_string(),
        };
        assert_eq!(failed.stderr(), Some("insufficient funds\n"));
        assert_eq!(failed.stdout(), Some("partial"));
        assert_eq!(failed.exit_code(), Some(1));

        let silent = InvocationError::NonZeroExit {
            command: "node send".to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: "  \n".to_string(),
        };
        assert_eq!(silent.stderr(), None);
        assert!(silent.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_missing_executable_is_a_spawn_error() {
        let argv: ArgumentVector = ["info"].into_iter().collect();
        let result = SystemInvoker.invoke(Path::new("./definitely-not-a-node-binary"), &argv);
        let err = result.unwrap_err();
        assert!(matches!(err, InvocationError::Spawn { .. }));
        assert_eq!(err.stderr(), None);
        assert_eq!(err.exit_code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_both_streams_on_failure() {
        let argv: ArgumentVector = ["-c", "echo out; echo err >&2; exit 3"].into_iter().collect();
        let err = SystemInvoker.invoke(Path::new("sh"), &argv).unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.stdout(), Some("out\n"));
        assert_eq!(err.stderr(), Some("err\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_on_success() {
        let argv: ArgumentVector = ["-c", "printf 'line one\\nline two'"].into_iter().collect();
        let result = SystemInvoker.invoke(Path::new("sh"), &argv).unwrap();
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "line one\nline two");
        assert!(result.stderr.is_empty());
    }
}
