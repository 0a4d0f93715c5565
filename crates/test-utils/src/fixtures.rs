//! Session records and capability results that tests across the workspace agree on.

use std::collections::BTreeMap;

use ren_gateway_capabilities::{DepositSignature, MintReceipt};
use ren_gateway_primitives::{
    burn::BurnSession,
    deposit::DetectedDeposit,
    session::GatewaySession,
    types::{CustomParams, Network, Timestamp},
};
use serde_json::json;

/// A fixed point in time, in milliseconds since the unix epoch.
pub const TEST_NOW: Timestamp = 1_700_000_000_000;

/// One hour, in milliseconds.
pub const ONE_HOUR_MS: Timestamp = 60 * 60 * 1_000;

/// The deposit address handed out by [`crate::mocks::MockSourceChain`] by default.
pub const TEST_GATEWAY_ADDRESS: &str = "tb1qgatewayaddress";

/// The protocol's hash for signed deposits and accepted burns.
pub const TEST_REN_VM_HASH: &str = "ren-vm-hash";

/// The protocol's signature for signed deposits.
pub const TEST_REN_SIGNATURE: &str = "ren-signature";

/// A lock-and-mint session from bitcoin to ethereum that has not been opened yet.
pub fn gateway_session(expiry_time: Timestamp) -> GatewaySession {
    GatewaySession {
        id: "mint-session".to_string(),
        network: Network::Testnet,
        source_chain: "bitcoin".to_string(),
        dest_chain: "ethereum".to_string(),
        source_asset: "BTC".to_string(),
        dest_address: "0x00000000000000000000000000000000000000aa".to_string(),
        user_address: "0x00000000000000000000000000000000000000aa".to_string(),
        expiry_time,
        custom_params: CustomParams::new(),
        gateway_address: None,
        transactions: BTreeMap::new(),
        error: None,
    }
}

/// A burn-and-release session from ethereum to bitcoin that has not been submitted yet.
pub fn burn_session() -> BurnSession {
    BurnSession {
        id: "burn-session".to_string(),
        network: Network::Testnet,
        source_chain: "ethereum".to_string(),
        dest_chain: "bitcoin".to_string(),
        source_asset: "BTC".to_string(),
        dest_address: "tb1qreleaseaddress".to_string(),
        user_address: "0x00000000000000000000000000000000000000bb".to_string(),
        target_amount: "50000".to_string(),
        custom_params: CustomParams::new(),
        transaction: None,
        error: None,
    }
}

/// A freshly detected deposit of `amount`.
pub fn detected_deposit(source_tx_hash: &str, amount: &str) -> DetectedDeposit {
    DetectedDeposit {
        source_tx_hash: source_tx_hash.to_string(),
        detected_at: TEST_NOW,
        source_tx_amount: amount.to_string(),
        raw_source_tx: json!({ "txid": source_tx_hash }),
        error: None,
    }
}

/// The signature returned by [`crate::mocks::MockProtocol`] by default.
pub fn deposit_signature() -> DepositSignature {
    DepositSignature {
        ren_vm_hash: TEST_REN_VM_HASH.to_string(),
        ren_signature: TEST_REN_SIGNATURE.to_string(),
    }
}

/// A mint that landed in a single transaction.
pub fn mint_receipt(dest_tx_hash: &str) -> MintReceipt {
    MintReceipt {
        dest_tx_hash: dest_tx_hash.to_string(),
        dest_tx_amount: Some("49000".to_string()),
    }
}
