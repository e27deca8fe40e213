// src/models.rs

use crate::constants::{DEFAULT_BINARY_NAME, LOG_NAMESPACE_MARKERS, LOG_SEVERITY_PREFIXES};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Error as _},
    ser::SerializeStruct,
};
use std::fmt;

// --- Operations ---

/// A single request the client can make of the node executable.
///
/// Operations are built fresh for every call and never change afterwards; the
/// argument vector handed to the executable is derived from them with [`Operation::argv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Print chain height, UTXO count and wallet balances.
    GetInfo,
    /// Create a new wallet and report its address.
    CreateWallet,
    /// Create a new chain whose genesis reward goes to `address`.
    CreateBlockchain {
        /// Receives the genesis reward.
        address: String,
    },
    /// Move coins between two addresses.
    SendTx(Transfer),
    /// Start a long-running node process.
    StartNode(NodeLaunch),
    /// Query the balance of a single address.
    GetBalance {
        /// The address to look up.
        address: String,
    },
}

impl Operation {
    /// The subcommand the node executable expects for this operation.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Self::GetInfo => "info",
            Self::CreateWallet => "create-wallet",
            Self::CreateBlockchain { .. } => "create-blockchain",
            Self::SendTx(_) => "send",
            Self::StartNode(_) => "start-node",
            Self::GetBalance { .. } => "get-balance",
        }
    }

    /// Builds the exact argument vector for the node executable.
    pub fn argv(&self) -> ArgumentVector {
        let mut args = vec![self.subcommand().to_string()];
        match self {
            Self::GetInfo | Self::CreateWallet => {}
            Self::CreateBlockchain { address } | Self::GetBalance { address } => {
                args.push(address.clone());
            }
            Self::SendTx(transfer) => {
                args.extend([
                    "--from".to_string(),
                    transfer.from.clone(),
                    "--to".to_string(),
                    transfer.to.clone(),
                    "--amount".to_string(),
                    transfer.amount.to_string(),
                ]);
                if transfer.mine {
                    args.push("--mine".to_string());
                }
            }
            Self::StartNode(launch) => {
                args.push(launch.port.to_string());
                if let Some(miner) = launch.miner() {
                    args.push("--miner_address".to_string());
                    args.push(miner.to_string());
                }
            }
        }
        ArgumentVector(args)
    }
}

/// Arguments of a `send` operation.
///
/// Deserialization is lenient: `null` or a missing field becomes the empty
/// value, and the amount may also arrive as a numeric string. The bridge then
/// rejects the incomplete transfer with its own validation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// Sending address.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub from: String,
    /// Receiving address.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub to: String,
    /// Coins to move. Zero means "not given".
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub amount: i64,
    /// Ask the node to mine the transaction into a block immediately.
    #[serde(default)]
    pub mine: bool,
}

impl Transfer {
    /// Creates a transfer that is broadcast without mining.
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: i64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            mine: false,
        }
    }

    /// A zero amount counts as missing, same as an empty address.
    pub fn is_complete(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty() && self.amount != 0
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountField {
    Number(i64),
    Text(String),
}

fn amount_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<AmountField>::deserialize(deserializer)? {
        None => Ok(0),
        Some(AmountField::Number(amount)) => Ok(amount),
        Some(AmountField::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(0);
            }
            text.parse().map_err(|_| {
                D::Error::invalid_value(de::Unexpected::Str(text), &"an integer amount")
            })
        }
    }
}

/// Arguments of a `start-node` operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLaunch {
    /// The port the node listens on.
    pub port: u16,
    /// Address that receives mining rewards, if this node mines.
    #[serde(default)]
    pub miner_address: Option<String>,
}

impl NodeLaunch {
    /// Describes a node on `port`, optionally mining to `miner_address`.
    pub fn new(port: u16, miner_address: Option<String>) -> Self {
        Self {
            port,
            miner_address,
        }
    }

    /// The miner address, if one was given and it is not empty.
    pub fn miner(&self) -> Option<&str> {
        self.miner_address.as_deref().filter(|addr| !addr.is_empty())
    }
}

// --- Process I/O ---

/// The ordered arguments passed to the node executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    /// The arguments, in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// An owned copy of the arguments.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for ArgumentVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ArgumentVector {
    /// Renders the arguments as a shell-quoted line, for log messages only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.0.iter().map(String::as_str)) {
            Ok(line) => f.write_str(&line),
            Err(_) => f.write_str(&self.0.join(" ")),
        }
    }
}

/// Everything a finished process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Everything written to stdout, decoded lossily as UTF-8.
    pub stdout: String,
    /// Everything written to stderr, decoded lossily as UTF-8.
    pub stderr: String,
}

// --- Outcome ---

/// The uniform result handed back to the client.
///
/// Serializes as `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation finished and produced `T`.
    Success(T),
    /// The operation failed; the message is meant for the user.
    Failure(String),
}

impl<T> Outcome<T> {
    /// Shorthand for `Outcome::Failure(message.into())`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Transforms the success value, leaving a failure untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(message) => Outcome::Failure(message),
        }
    }

    /// Converts into a `Result` with the failure message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(message) => Err(message),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

// --- Configuration (bridge.toml) ---

/// The top-level structure of `bridge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// The `[binary]` table.
    #[serde(default)]
    pub binary: BinaryConfig,
    /// The `[sanitizer]` table.
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

/// Where to find the node executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// An explicit path. Supports `~` and environment variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The executable's file stem inside the resources directory.
    #[serde(default = "default_binary_name")]
    pub name: String,
    /// A build output to copy into the resources directory when it is missing there.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_output: Option<String>,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            path: None,
            name: default_binary_name(),
            build_output: None,
        }
    }
}

fn default_binary_name() -> String {
    DEFAULT_BINARY_NAME.to_string()
}

/// Rules for telling log noise apart from the payload on the node's stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// A line containing any of these is dropped.
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    /// A line starting with any of these (after leading whitespace) is dropped.
    #[serde(default = "default_severities")]
    pub severities: Vec<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            markers: default_markers(),
            severities: default_severities(),
        }
    }
}

fn default_markers() -> Vec<String> {
    LOG_NAMESPACE_MARKERS.iter().map(|m| m.to_string()).collect()
}

fn default_severities() -> Vec<String> {
    LOG_SEVERITY_PREFIXES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_for_fixed_operations() {
        assert_eq!(Operation::GetInfo.argv().to_vec(), vec!["info"]);
        assert_eq!(Operation::CreateWallet.argv().to_vec(), vec!["create-wallet"]);
        let op = Operation::CreateBlockchain {
            address: "1Abc".to_string(),
        };
        assert_eq!(op.argv().to_vec(), vec!["create-blockchain", "1Abc"]);
    }

    #[test]
    fn test_argv_for_send() {
        let op = Operation::SendTx(Transfer::new("alice", "bob", 42));
        assert_eq!(
            op.argv().to_vec(),
            vec!["send", "--from", "alice", "--to", "bob", "--amount", "42"]
        );

        let mined = Operation::SendTx(Transfer {
            mine: true,
            ..Transfer::new("alice", "bob", 7)
        });
        assert_eq!(mined.argv().as_slice().last().map(String::as_str), Some("--mine"));
    }

    #[test]
    fn test_argv_for_start_node() {
        let plain = Operation::StartNode(NodeLaunch::new(3000, None));
        assert_eq!(plain.argv().to_vec(), vec!["start-node", "3000"]);

        let miner = Operation::StartNode(NodeLaunch::new(3000, Some("addrX".to_string())));
        assert_eq!(
            miner.argv().to_vec(),
            vec!["start-node", "3000", "--miner_address", "addrX"]
        );

        // An empty miner address is treated as absent.
        let empty = Operation::StartNode(NodeLaunch::new(3001, Some(String::new())));
        assert_eq!(empty.argv().to_vec(), vec!["start-node", "3001"]);
    }

    #[test]
    fn test_transfer_completeness() {
        assert!(Transfer::new("a", "b", 1).is_complete());
        assert!(!Transfer::new("", "b", 1).is_complete());
        assert!(!Transfer::new("a", "", 1).is_complete());
        assert!(!Transfer::new("a", "b", 0).is_complete());
    }

    #[test]
    fn test_transfer_accepts_null_and_empty_fields() {
        let transfer: Transfer =
            serde_json::from_str(r#"{"from": null, "to": "b", "amount": 5}"#).unwrap();
        assert_eq!(transfer, Transfer::new("", "b", 5));
        assert!(!transfer.is_complete());

        let transfer: Transfer =
            serde_json::from_str(r#"{"from": "a", "to": "b", "amount": null}"#).unwrap();
        assert_eq!(transfer.amount, 0);

        let transfer: Transfer =
            serde_json::from_str(r#"{"from": "a", "to": "b", "amount": ""}"#).unwrap();
        assert_eq!(transfer.amount, 0);

        let transfer: Transfer =
            serde_json::from_str(r#"{"from": "a", "to": "b", "amount": " 12 "}"#).unwrap();
        assert_eq!(transfer, Transfer::new("a", "b", 12));
    }

    #[test]
    fn test_transfer_rejects_non_numeric_amount() {
        let result = serde_json::from_str::<Transfer>(r#"{"from": "a", "to": "b", "amount": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_argument_vector_display_quotes_spaces() {
        let argv: ArgumentVector = ["send", "--from", "my wallet"].into_iter().collect();
        let rendered = argv.to_string();
        assert!(rendered.starts_with("send --from "));
        assert!(rendered.contains("my wallet"));
        assert_ne!(rendered, "send --from my wallet");
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let ok: Outcome<String> = Outcome::Success("abc".to_string());
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({ "success": true, "data": "abc" })
        );

        let failed: Outcome<String> = Outcome::failure("boom");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "success": false, "error": "boom" })
        );
    }

    #[test]
    fn test_bridge_config_defaults_round_trip_through_toml() {
        let config = BridgeConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: BridgeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.binary.name, DEFAULT_BINARY_NAME);
        assert_eq!(parsed.sanitizer.severities, vec!["TRACE", "DEBUG", "INFO"]);
    }

    #[test]
    fn test_bridge_config_partial_file_uses_defaults() {
        let parsed: BridgeConfig = toml::from_str("[binary]\npath = \"/opt/node\"\n").unwrap();
        assert_eq!(parsed.binary.path.as_deref(), Some("/opt/node"));
        assert_eq!(parsed.binary.name, DEFAULT_BINARY_NAME);
        assert_eq!(parsed.sanitizer, SanitizerConfig::default());
    }
}
