//! The persisted record of a lock-and-mint transfer intent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    deposit::DepositTransaction,
    types::{CustomParams, Network, Timestamp, TxHash},
};

/// One mint intent together with every deposit observed for it.
///
/// This is plain data: it can be persisted at any point between two events and fed back into a
/// fresh session to resume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySession {
    /// Opaque unique identifier of the session.
    pub id: String,

    /// The protocol deployment this session runs against.
    pub network: Network,

    /// Name of the chain the asset is locked on.
    pub source_chain: String,

    /// Name of the chain the wrapped asset is minted on.
    pub dest_chain: String,

    /// The asset being transferred.
    pub source_asset: String,

    /// Recipient of the minted asset on the destination chain.
    pub dest_address: String,

    /// The user that owns this session.
    pub user_address: String,

    /// When the session stops accepting deposits.
    pub expiry_time: Timestamp,

    /// Free-form parameters supplied by the caller.
    #[serde(default)]
    pub custom_params: CustomParams,

    /// The deposit address allocated on the source chain. Set once the session is opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_address: Option<String>,

    /// Every deposit seen for this session, keyed by its source transaction hash.
    #[serde(default)]
    pub transactions: BTreeMap<TxHash, DepositTransaction>,

    /// The last session-level error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GatewaySession {
    /// Whether a deposit address has been allocated for this session.
    pub const fn is_opened(&self) -> bool {
        self.gateway_address.is_some()
    }

    /// Whether the session has expired at `now`.
    pub const fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiry_time
    }

    /// Returns the persisted record for the given deposit.
    pub fn transaction(&self, source_tx_hash: &str) -> Option<&DepositTransaction> {
        self.transactions.get(source_tx_hash)
    }

    /// Inserts or replaces the record for a deposit, keyed by its source transaction hash.
    ///
    /// Returns the record it replaced, if any.
    pub fn upsert_transaction(&mut self, record: DepositTransaction) -> Option<DepositTransaction> {
        self.transactions
            .insert(record.source_tx_hash().clone(), record)
    }

    /// Returns this session with the given error recorded.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
