use crate::cli::handlers::commons::{self, Session};
use anyhow::Result;
use clap::Parser;

/// Print blockchain and wallet information.
#[derive(Parser, Debug)]
#[command(name = "info")]
struct InfoArgs {}

/// Prints the node summary.
pub fn handle(args: Vec<String>, session: &Session) -> Result<()> {
    let _: InfoArgs = commons::parse_args("info", args);
    commons::report(session.bridge.get_info(), session.format)
}
