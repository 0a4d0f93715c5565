//! Scalar types shared by every session record.

use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};

/// Hash of a transaction on any chain, in the chain's own textual encoding.
pub type TxHash = String;

/// Milliseconds since the unix epoch.
pub type Timestamp = u64;

/// Free-form parameters attached to a session or passed to a destination contract call.
pub type CustomParams = BTreeMap<String, serde_json::Value>;

/// The deployment of the cross-chain protocol that a session runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production deployment.
    Mainnet,
    /// Public test deployment.
    Testnet,
    /// Local or ephemeral deployment.
    Devnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let network_str = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        };
        write!(f, "{}", network_str)
    }
}

/// Returns the current wall-clock time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    // pre-epoch clocks are clamped to zero
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
