// src/core/mod.rs

/// The command bridge facade.
pub mod bridge;
pub mod config_loader;
/// Pulls values out of the node's stdout.
pub mod parser;
/// Config directory and node executable location.
pub mod paths;
/// Removes log noise from the node's stdout.
pub mod sanitizer;
