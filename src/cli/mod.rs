use clap::Parser;

/// One handler per command.
pub mod handlers;

/// chain-bridge: runs wallet and node operations against the blockchain node executable.
///
/// Each command starts the node executable once, waits for it, and prints the
/// outcome. `start-node` is the exception: the node keeps running in the
/// background after chain-bridge exits.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(after_help = t!("cli.help.commands"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Print every outcome as a JSON object: `{"success": ..., "data" | "error": ...}`.
    #[arg(long)]
    pub json: bool,

    /// The command to run. See the list of commands below.
    pub command: Option<String>,

    /// Arguments for the command. Run `chain-bridge <command> --help` for details.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
