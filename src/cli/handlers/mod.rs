// src/cli/handlers/mod.rs

// One module per command. Each exposes `handle(args, session)`.

/// Shared plumbing for the command handlers.
pub mod commons;
/// `create-blockchain <ADDRESS>`
pub mod create_blockchain;
/// `create-wallet`
pub mod create_wallet;
/// `get-balance <ADDRESS>`
pub mod get_balance;
/// `info`
pub mod info;
/// `send --from <A> --to <B> --amount <N>`
pub mod send;
pub mod serve;
/// `start-node <PORT>`
pub mod start_node;
