//! # System Interaction Layer
//!
//! This module is the boundary between the bridge and the operating system's
//! process table. Nothing above it touches `std::process` directly.
//!
//! ## Modules
//!
//! - **`executor`**: Runs the node executable to completion with piped output and
//!   reports non-zero exits together with the captured streams.
//! - **`supervisor`**: Launches long-running node processes detached from the
//!   bridge, with their standard streams discarded.

/// Runs the node to completion.
pub mod executor;
/// Starts detached nodes.
pub mod supervisor;
