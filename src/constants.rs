// src/constants.rs

/// The name of the directory holding chain-bridge configuration (in ~/.config/).
pub const CONFIG_DIR_NAME: &str = "chain-bridge";

/// The name of the main configuration file (inside the config directory).
pub const CONFIG_FILENAME: &str = "bridge.toml";

/// The directory, inside the config directory, where the node executable is provisioned.
pub const RESOURCES_DIR_NAME: &str = "resources";

/// The file stem of the external node executable.
pub const DEFAULT_BINARY_NAME: &str = "blockchain-demo";

/// Environment variable that overrides every other way of locating the node executable.
pub const BINARY_ENV_VAR: &str = "CHAIN_BRIDGE_BINARY";

/// Substrings that mark a stdout line as log output from the node's internals.
pub const LOG_NAMESPACE_MARKERS: [&str; 2] = ["[blockchain_demo]", "[sled::"];

/// Severity tokens that mark a stdout line as log output when it starts with them.
pub const LOG_SEVERITY_PREFIXES: [&str; 3] = ["TRACE", "DEBUG", "INFO"];
