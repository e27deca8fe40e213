use crate::cli::handlers::commons::{self, Session};
use anyhow::Result;
use clap::Parser;

/// Start a node in the background. It keeps running after this command returns.
#[derive(Parser, Debug)]
#[command(name = "start-node")]
struct StartNodeArgs {
    /// The port the node listens on.
    port: u16,
    /// Run as a miner, paying block rewards to this address.
    #[arg(long, alias = "miner_address")]
    miner_address: Option<String>,
}

/// Starts a detached node and returns right away.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let args: StartNodeArgs = commons::parse_args("start-node", args);
    let outcome = session
        .bridge
        .start_node(args.port, args.miner_address.as_deref());
    commons::report(outcome, session.format)
}
