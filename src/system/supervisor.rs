// src/system/supervisor.rs

use crate::models::ArgumentVector;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpawnError {
    /// The operating system refused to start the process.
    #[error("Node process '{command}' could not be started: {source}")]
    Io {
        /// The command line, for messages.
        command: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Starts node processes that outlive the bridge.
///
/// A successful spawn returns `()`: no handle comes back, so a node started
/// this way cannot be queried, stopped or waited on later.
pub trait NodeSupervisor: Send + Sync {
    /// Starts `program` with `argv` and returns once the process exists.
    fn spawn_detached(&self, program: &Path, argv: &ArgumentVector) -> Result<(), SpawnError>;
}

/// The real supervisor. Stdio goes to the null device and the child gets its
/// own process group, so closing the desktop shell does not take the node down.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSupervisor;

impl NodeSupervisor for DetachedSupervisor {
    fn spawn_detached(&self, program: &Path, argv: &ArgumentVector) -> Result<(), SpawnError> {
        let program = dunce::simplified(program);
        let command_line = format!("{} {}", program.display(), argv);

        let mut command = StdCommand::new(program);
        command
            .args(argv.as_slice())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut command);

        let pid = spawn_reaped(&mut command).map_err(|e| SpawnError::Io {
            command: command_line.clone(),
            source: e,
        })?;
        log::info!("Started detached node (PID: {}): {}", pid, command_line);
        Ok(())
    }
}

/// Spawns `command` and hands the child to a background thread that waits on it,
/// so an exited node does not linger as a zombie. Returns the child's PID.
fn spawn_reaped(command: &mut StdCommand) -> std::io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    let reaper = thread::Builder::new()
        .name(format!("node-reaper-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => log::debug!("Detached node (PID: {}) exited with {}", pid, status),
            Err(e) => log::warn!("Could not wait on detached node (PID: {}): {}", pid, e),
        });
    if let Err(e) = reaper {
        // The child was moved into the closure and dropped with it; it keeps running.
        log::warn!("Could not start reaper for node (PID: {}): {}", pid, e);
    }
    Ok(pid)
}

#[cfg(unix)]
fn detach(command: &mut StdCommand) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut StdCommand) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut StdCommand) {}
