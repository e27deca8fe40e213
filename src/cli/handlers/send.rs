use crate::{
    cli::handlers::commons::{self, Session},
    models::Transfer,
};
use anyhow::Result;
use clap::Parser;

/// Send coins from one wallet address to another.
#[derive(Parser, Debug)]
#[command(name = "send")]
struct SendArgs {
    /// Sending wallet address.
    #[arg(long)]
    from: String,
    /// Receiving wallet address.
    #[arg(long)]
    to: String,
    /// Number of coins to send.
    #[arg(long, allow_hyphen_values = true)]
    amount: i64,
    /// Mine the transaction into a new block right away.
    #[arg(long)]
    mine: bool,
}

/// Sends coins between two addresses.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let args: SendArgs = commons::parse_args("send", args);
    let transfer = Transfer {
        mine: args.mine,
        ..Transfer::new(args.from, args.to, args.amount)
    };
    commons::report(session.bridge.send_tx(&transfer), session.format)
}
