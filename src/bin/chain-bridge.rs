// src/bin/chain-bridge.rs

use anyhow::{Context, Result, anyhow};
use chain_bridge::{
    cli::{
        Cli,
        handlers::{
            self,
            commons::{OutputFormat, ReportedFailure, Session},
        },
    },
    core::{bridge::CommandBridge, config_loader},
    t,
};
use clap::Parser;
use colored::*;
use std::sync::Arc;

// --- Command Definition and Registry ---

/// A command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Session) -> Result<()>,
}

/// Every command chain-bridge understands. To add one, add an entry here.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "create-blockchain",
        aliases: &[],
        handler: handlers::create_blockchain::handle,
    },
    CommandDefinition {
        name: "create-wallet",
        aliases: &["wallet"],
        handler: handlers::create_wallet::handle,
    },
    CommandDefinition {
        name: "get-balance",
        aliases: &["balance"],
        handler: handlers::get_balance::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "send",
        aliases: &["send-tx"],
        handler: handlers::send::handle,
    },
    CommandDefinition {
        name: "serve",
        aliases: &[],
        handler: handlers::serve::handle,
    },
    CommandDefinition {
        name: "start-node",
        aliases: &[],
        handler: handlers::start_node::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Sets up logging, runs the requested command and turns errors into exit codes.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // JSON mode already printed the failure on stdout.
        if e.downcast_ref::<ReportedFailure>().is_some() {
            std::process::exit(1);
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let name = cli
        .command
        .ok_or_else(|| anyhow!(t!("cli.error.no_command")))?;
    let command = find_command(&name)
        .ok_or_else(|| anyhow!(format!(t!("cli.error.unknown_command"), name = name)))?;

    let config = config_loader::load_config().context("Failed to load bridge configuration")?;
    let bridge = CommandBridge::from_config(&config).context("Failed to locate the node executable")?;
    log::debug!("Node executable: {}", bridge.program().display());

    let session = Session {
        bridge: Arc::new(bridge),
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        },
    };
    (command.handler)(cli.args, &session)
}
