// Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// A stand-in for the node executable. It mimics the real node's output,
/// including the log lines it mixes into stdout.
const FAKE_NODE: &str = r#"#!/bin/sh
case "$1" in
  info)
    echo "[2025-01-01T00:00:00Z INFO  blockchain_demo] [blockchain_demo] opening database"
    echo "Blockchain Info:"
    echo "TRACE sled::pagecache loaded"
    echo "Blocks:         1"
    echo "Wallet Count:   1"
    ;;
  create-wallet)
    echo "Wallet created"
    echo "Address: 1FakeAddr"
    ;;
  create-blockchain)
    echo "DEBUG mining genesis block"
    echo "Blockchain created for $2"
    ;;
  get-balance)
    echo "INFO reading utxo set"
    echo "Balance of '$2': 10"
    ;;
  send)
    if [ "$7" -gt 10 ]; then
      echo "Error: insufficient funds" >&2
      exit 1
    fi
    echo "INFO signing transaction"
    echo "Success!"
    ;;
  start-node)
    sleep 2
    ;;
  *)
    echo "unknown command: $1" >&2
    exit 2
    ;;
esac
"#;

/// Writes the fake node into `dir` and makes it executable.
pub fn write_fake_node(dir: &Path) -> PathBuf {
    let path = dir.join("fake-node");
    fs::write(&path, FAKE_NODE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
