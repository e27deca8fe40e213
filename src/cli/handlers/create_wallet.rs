use crate::cli::handlers::commons::{self, Session};
use anyhow::Result;
use clap::Parser;

/// Create a new wallet and print its address.
#[derive(Parser, Debug)]
#[command(name = "create-wallet")]
struct CreateWalletArgs {}

/// Creates a wallet and prints its address.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let _: CreateWalletArgs = commons::parse_args("create-wallet", args);
    let outcome = session.bridge.create_wallet();
    if matches!(&outcome, crate::models::Outcome::Success(address) if address.is_empty()) {
        // The node printed something without an address in it.
        log::warn!("The node did not report a wallet address.");
    }
    commons::report(outcome, session.format)
}
