// src/core/bridge.rs

use crate::{
    core::{
        parser,
        paths::{self, PathError},
        sanitizer::{LogLineFilter, OutputFilter},
    },
    models::{BridgeConfig, NodeLaunch, Operation, Outcome, ProcessResult, Transfer},
    system::{
        executor::{InvocationError, ProcessInvoker, SystemInvoker},
        supervisor::{DetachedSupervisor, NodeSupervisor},
    },
};
use serde_json::Value;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

/// A request rejected before the node executable was started.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `create_blockchain` or `get_balance` got an empty address.
    #[error("{}", t!("bridge.validation.address_required"))]
    AddressRequired,
    /// `send_tx` is missing a sender, a receiver or a non-zero amount.
    #[error("{}", t!("bridge.validation.send_fields_required"))]
    SendFieldsRequired,
}

/// The single entry point between the client and the node executable.
///
/// Every method returns an [`Outcome`]; errors never escape as Rust errors.
/// The bridge holds no mutable state, so one instance can serve overlapping
/// calls from several threads.
pub struct CommandBridge {
    program: PathBuf,
    invoker: Box<dyn ProcessInvoker>,
    supervisor: Box<dyn NodeSupervisor>,
    filter: Box<dyn OutputFilter>,
}

impl fmt::Debug for CommandBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBridge")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl CommandBridge {
    /// Creates a bridge that talks to `program` through the real process table.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            invoker: Box::new(SystemInvoker),
            supervisor: Box::new(DetachedSupervisor),
            filter: Box::new(LogLineFilter::default()),
        }
    }

    /// Locates the node executable and builds the output filter from `bridge.toml` settings.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, PathError> {
        let program = paths::locate_binary(&config.binary)?;
        Ok(Self::new(program).with_filter(LogLineFilter::from_config(&config.sanitizer)))
    }

    /// Replaces the process invoker, e.g. with a test double.
    pub fn with_invoker(mut self, invoker: impl ProcessInvoker + 'static) -> Self {
        self.invoker = Box::new(invoker);
        self
    }

    /// Replaces the supervisor used by `start_node`.
    pub fn with_supervisor(mut self, supervisor: impl NodeSupervisor + 'static) -> Self {
        self.supervisor = Box::new(supervisor);
        self
    }

    /// Replaces the filter applied to stdout before it is returned.
    pub fn with_filter(mut self, filter: impl OutputFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// The node executable this bridge invokes.
    pub fn program(&self) -> &Path {
        &self.program
    }

    // --- Operations ---

    /// Chain and wallet summary, with log lines removed.
    pub fn get_info(&self) -> Outcome<String> {
        match self.invoke(&Operation::GetInfo) {
            Ok(result) => Outcome::Success(self.filter.sanitize(&result.stdout)),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }

    /// Creates a wallet and returns its address.
    ///
    /// Output without an address yields an empty string, not a failure.
    pub fn create_wallet(&self) -> Outcome<String> {
        match self.invoke(&Operation::CreateWallet) {
            Ok(result) => Outcome::Success(parser::extract_address(&result.stdout)),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }

    /// Creates a chain rewarding `address`. Returns the node's stdout unfiltered.
    pub fn create_blockchain(&self, address: &str) -> Outcome<String> {
        if address.is_empty() {
            return Outcome::Failure(ValidationError::AddressRequired.to_string());
        }
        let operation = Operation::CreateBlockchain {
            address: address.to_string(),
        };
        match self.invoke(&operation) {
            Ok(result) => Outcome::Success(result.stdout),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }

    /// Sends coins. The node reports domain errors (insufficient funds, unknown
    /// wallet) on stderr, so a failure carries stderr when there is any.
    pub fn send_tx(&self, transfer: &Transfer) -> Outcome<String> {
        if !transfer.is_complete() {
            return Outcome::Failure(ValidationError::SendFieldsRequired.to_string());
        }
        match self.invoke(&Operation::SendTx(transfer.clone())) {
            Ok(result) => Outcome::Success(self.filter.sanitize(&result.stdout)),
            Err(e) => Outcome::Failure(
                e.stderr()
                    .map(|stderr| stderr.trim_end().to_string())
                    .unwrap_or_else(|| e.to_string()),
            ),
        }
    }

    /// Starts a node in the background and returns as soon as it has been spawned.
    ///
    /// The node is not tracked afterwards: if it crashes later, nobody is told.
    pub fn start_node(&self, port: u16, miner_address: Option<&str>) -> Outcome<String> {
        let operation = Operation::StartNode(NodeLaunch::new(
            port,
            miner_address.map(str::to_string),
        ));
        let argv = operation.argv();
        let call_id = Uuid::new_v4();
        log::debug!(
            "[{}] Spawning node executable for {}: {}",
            call_id,
            operation.subcommand(),
            self.program.display()
        );

        match self.supervisor.spawn_detached(&self.program, &argv) {
            Ok(()) => Outcome::Success(t!("bridge.node.started").to_string()),
            Err(e) => {
                log::error!("[{}] Error starting node: {}", call_id, e);
                Outcome::Failure(e.to_string())
            }
        }
    }

    /// Balance of a single address.
    pub fn get_balance(&self, address: &str) -> Outcome<i64> {
        if address.is_empty() {
            return Outcome::Failure(ValidationError::AddressRequired.to_string());
        }
        let operation = Operation::GetBalance {
            address: address.to_string(),
        };
        let result = match self.invoke(&operation) {
            Ok(result) => result,
            Err(e) => return Outcome::Failure(e.to_string()),
        };

        let clean = self.filter.sanitize(&result.stdout);
        match parser::extract_balance(&clean) {
            Some(balance) => Outcome::Success(balance),
            None => Outcome::Failure(format!(
                t!("bridge.balance.unexpected_output"),
                output = clean.trim()
            )),
        }
    }

    /// Routes a generic operation to its typed entry point.
    pub fn dispatch(&self, operation: &Operation) -> Outcome<Value> {
        match operation {
            Operation::GetInfo => self.get_info().map(Value::String),
            Operation::CreateWallet => self.create_wallet().map(Value::String),
            Operation::CreateBlockchain { address } => {
                self.create_blockchain(address).map(Value::String)
            }
            Operation::SendTx(transfer) => self.send_tx(transfer).map(Value::String),
            Operation::StartNode(launch) => {
                self.start_node(launch.port, launch.miner()).map(Value::String)
            }
            Operation::GetBalance { address } => self.get_balance(address).map(Value::from),
        }
    }

    // --- Helpers ---

    fn invoke(&self, operation: &Operation) -> Result<ProcessResult, InvocationError> {
        let call_id = Uuid::new_v4();
        log::debug!(
            "[{}] Executing node executable for {}: {}",
            call_id,
            operation.subcommand(),
            self.program.display()
        );

        let result = self.invoker.invoke(&self.program, &operation.argv());
        if let Err(e) = &result {
            log::error!("[{}] Error executing node executable: {}", call_id, e);
        }
        result
    }
}
