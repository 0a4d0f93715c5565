//! Context for the Gateway State Machine.

use std::collections::{BTreeMap, BTreeSet};

use ren_gateway_primitives::{session::GatewaySession, types::TxHash};
use serde::{Deserialize, Serialize};

use crate::deposit::machine::DepositSM;

/// Everything a single instance of the Gateway State Machine owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySMCtx {
    /// The session record. Deposit records in it are copies of what the children reported.
    pub tx: GatewaySession,

    /// Deposits that can currently be claimed.
    pub mint_requests: BTreeSet<TxHash>,

    /// The child machine of every deposit spawned so far, keyed by source transaction hash.
    pub deposits: BTreeMap<TxHash, DepositSM>,
}

impl GatewaySMCtx {
    /// Creates the context for a session that has not spawned any deposit yet.
    pub const fn new(tx: GatewaySession) -> Self {
        Self {
            tx,
            mint_requests: BTreeSet::new(),
            deposits: BTreeMap::new(),
        }
    }
}
