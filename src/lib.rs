//! # chain-bridge
//!
//! A command bridge between a desktop wallet client and an external blockchain
//! node executable. Every operation the client can request is translated into a
//! process invocation, and every result comes back as a uniform [`models::Outcome`].

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command-line front end and the `serve` IPC channel.
pub mod cli;
/// Names and defaults shared across the crate.
pub mod constants;
/// The bridge itself, plus configuration and output parsing.
pub mod core;
/// Data types: operations, outcomes and configuration.
pub mod models;
pub mod system;
