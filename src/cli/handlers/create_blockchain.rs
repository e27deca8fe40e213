use crate::cli::handlers::commons::{self, Session};
use anyhow::Result;
use clap::Parser;

/// Create a new blockchain whose genesis reward goes to ADDRESS.
#[derive(Parser, Debug)]
#[command(name = "create-blockchain")]
struct CreateBlockchainArgs {
    /// The wallet address that receives the genesis reward.
    address: String,
}

/// Creates a blockchain rewarding the given address.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let args: CreateBlockchainArgs = commons::parse_args("create-blockchain", args);
    commons::report(session.bridge.create_blockchain(&args.address), session.format)
}
