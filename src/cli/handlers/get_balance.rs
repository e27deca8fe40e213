use crate::cli::handlers::commons::{self, Session};
use anyhow::Result;
use clap::Parser;

/// Print the balance of a wallet address.
#[derive(Parser, Debug)]
#[command(name = "get-balance")]
struct GetBalanceArgs {
    address: String,
}

/// Prints the balance of an address.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let args: GetBalanceArgs = commons::parse_args("get-balance", args);
    commons::report(session.bridge.get_balance(&args.address), session.format)
}
