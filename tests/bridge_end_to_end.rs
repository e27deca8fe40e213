// Runs every bridge operation against a scripted node executable.

#![cfg(unix)]

mod common;

use chain_bridge::{
    core::bridge::CommandBridge,
    models::{Outcome, Transfer},
};
use std::time::{Duration, Instant};
use tempfile::TempDir;

// Kept as a single test: forking from several threads while the script is
// being written can make exec fail with ETXTBSY.
#[test]
fn test_operations_against_fake_node() {
    let dir = TempDir::new().unwrap();
    let bridge = CommandBridge::new(common::write_fake_node(dir.path()));

    // --- info: log lines are stripped ---
    assert_eq!(
        bridge.get_info(),
        Outcome::Success("Blockchain Info:\nBlocks:         1\nWallet Count:   1\n".to_string())
    );

    // --- create-wallet: address after the last colon ---
    assert_eq!(bridge.create_wallet(), Outcome::Success("1FakeAddr".to_string()));

    // --- create-blockchain: stdout is returned as-is ---
    assert_eq!(
        bridge.create_blockchain("1FakeAddr"),
        Outcome::Success("DEBUG mining genesis block\nBlockchain created for 1FakeAddr\n".to_string())
    );

    // --- get-balance ---
    assert_eq!(bridge.get_balance("1FakeAddr"), Outcome::Success(10));

    // --- send: success is sanitized, failure reports stderr ---
    assert_eq!(
        bridge.send_tx(&Transfer::new("1FakeAddr", "1Other", 5)),
        Outcome::Success("Success!\n".to_string())
    );
    assert_eq!(
        bridge.send_tx(&Transfer::new("1FakeAddr", "1Other", 50)),
        Outcome::Failure("Error: insufficient funds".to_string())
    );

    // --- start-node: returns while the node is still sleeping ---
    let started = Instant::now();
    assert_eq!(
        bridge.start_node(3000, Some("1FakeAddr")),
        Outcome::Success("Node started".to_string())
    );
    assert!(started.elapsed() < Duration::from_secs(1));

    // --- a missing executable fails every operation ---
    let missing = CommandBridge::new(dir.path().join("not-installed"));
    assert!(!missing.get_info().is_success());
    assert!(!missing.create_wallet().is_success());
    assert!(!missing.create_blockchain("1Abc").is_success());
    assert!(!missing.send_tx(&Transfer::new("a", "b", 1)).is_success());
    assert!(!missing.start_node(3000, None).is_success());
}
