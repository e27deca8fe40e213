//! # IPC Channel
//!
//! `chain-bridge serve` answers requests from a desktop client over stdin/stdout.
//! Every stdin line is one JSON request:
//!
//! ```text
//! {"id": 7, "channel": "send-tx", "payload": {"from": "1A..", "to": "1B..", "amount": 5}}
//! ```
//!
//! and every stdout line is the matching response:
//!
//! ```text
//! {"id": 7, "success": false, "error": "insufficient funds"}
//! ```
//!
//! Requests run concurrently on tokio's blocking pool, so responses can arrive
//! out of order; clients match them up by `id`.

use crate::{
    cli::handlers::commons::{self, Session},
    core::bridge::CommandBridge,
    models::{NodeLaunch, Operation, Outcome, Transfer},
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
    task::JoinSet,
};

/// Answer JSON requests from stdin, one per line.
#[derive(Parser, Debug)]
#[command(name = "serve")]
struct ServeArgs {}

#[derive(Deserialize, Debug)]
struct Request {
    #[serde(default)]
    id: Value,
    channel: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Serialize, Debug)]
struct Response {
    id: Value,
    #[serde(flatten)]
    outcome: Outcome<Value>,
}

/// Runs the IPC loop until stdin closes or Ctrl+C.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let _: ServeArgs = commons::parse_args("serve", args);
    eprintln!(
        "{}",
        format!(
            t!("cli.info.binary"),
            path = session.bridge.program().display()
        )
        .dimmed()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let result = runtime.block_on(serve(Arc::clone(&session.bridge)));
    // A pending stdin read must not hold up exit.
    runtime.shutdown_background();

    let count = result?;
    eprintln!("{}", format!(t!("ipc.info.stopped"), count = count).dimmed());
    Ok(())
}

/// Reads requests until stdin closes or Ctrl+C, then waits for in-flight requests.
async fn serve(bridge: Arc<CommandBridge>) -> Result<usize> {
    eprintln!("{}", t!("ipc.info.listening").dimmed());

    let (responses, mut outbox) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = outbox.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = JoinSet::new();
    let mut count = 0usize;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read request from stdin")? else {
                    log::debug!("stdin closed; no more requests.");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                count += 1;
                let bridge = Arc::clone(&bridge);
                let responses = responses.clone();
                in_flight.spawn_blocking(move || {
                    let response = handle_line(&bridge, &line);
                    match serde_json::to_string(&response) {
                        Ok(json) => {
                            if responses.send(json).is_err() {
                                log::warn!("Response writer is gone; dropping response.");
                            }
                        }
                        Err(e) => log::error!("Failed to serialize response: {}", e),
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                log::debug!("Ctrl+C received; shutting down.");
                break;
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    log::error!("Request task failed: {}", e);
                }
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            log::error!("Request task failed: {}", e);
        }
    }

    drop(responses);
    writer
        .await
        .context("Response writer task failed")?
        .context("Failed to write response to stdout")?;
    Ok(count)
}

/// Parses and runs a single request line.
fn handle_line(bridge: &CommandBridge, line: &str) -> Response {
    match parse_request(line) {
        Ok((id, operation)) => {
            log::debug!("Request {}: {}", id, operation.subcommand());
            Response {
                id,
                outcome: bridge.dispatch(&operation),
            }
        }
        Err((id, message)) => Response {
            id,
            outcome: Outcome::Failure(message),
        },
    }
}

fn parse_request(line: &str) -> Result<(Value, Operation), (Value, String)> {
    let request: Request = serde_json::from_str(line).map_err(|e| {
        (
            Value::Null,
            format!(t!("ipc.error.malformed_request"), reason = e),
        )
    })?;

    match operation_for(&request.channel, request.payload) {
        Ok(operation) => Ok((request.id, operation)),
        Err(message) => Err((request.id, message)),
    }
}

/// Maps a channel name and its payload to an operation.
///
/// A missing address or transfer field is not an error here; the bridge
/// rejects it with its usual validation message.
fn operation_for(channel: &str, payload: Value) -> Result<Operation, String> {
    let invalid =
        |reason: String| format!(t!("ipc.error.invalid_payload"), channel = channel, reason = reason);

    match channel {
        "get-info" => Ok(Operation::GetInfo),
        "create-wallet" => Ok(Operation::CreateWallet),
        "create-blockchain" => Ok(Operation::CreateBlockchain {
            address: address_from(payload).map_err(invalid)?,
        }),
        "get-balance" => Ok(Operation::GetBalance {
            address: address_from(payload).map_err(invalid)?,
        }),
        "send-tx" => {
            let transfer = if payload.is_null() {
                Transfer::default()
            } else {
                serde_json::from_value(payload).map_err(|e| invalid(e.to_string()))?
            };
            Ok(Operation::SendTx(transfer))
        }
        "start-node" => {
            let launch: NodeLaunch =
                serde_json::from_value(payload).map_err(|e| invalid(e.to_string()))?;
            Ok(Operation::StartNode(launch))
        }
        other => Err(format!(t!("ipc.error.unknown_channel"), channel = other)),
    }
}

/// Accepts `"1Abc"`, `{"address": "1Abc"}` or nothing at all.
fn address_from(payload: Value) -> Result<String, String> {
    match payload {
        Value::Null => Ok(String::new()),
        Value::String(address) => Ok(address),
        Value::Object(mut fields) => match fields.remove("address") {
            Some(Value::String(address)) => Ok(address),
            Some(Value::Null) | None => Ok(String::new()),
            Some(other) => Err(format!("expected an address string, found {other}")),
        },
        other => Err(format!("expected an address string, found {other}")),
    }
}
