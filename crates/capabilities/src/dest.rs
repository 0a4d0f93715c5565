//! The capability of the chain that mints are submitted to and burns are made on.

use std::fmt::Debug;

use async_trait::async_trait;
use ren_gateway_primitives::{
    burn::BurnSession, deposit::SubmittingDeposit, subscription::Subscription, types::TxHash,
};

use crate::{errors::CapabilityResult, protocol::BurnProgress};

/// The outcome of a successful mint submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    /// Hash of the mint transaction.
    pub dest_tx_hash: TxHash,

    /// The minted amount, if already final.
    pub dest_tx_amount: Option<String>,
}

/// Access to the chain that wrapped assets live on.
#[async_trait]
pub trait DestChain: Debug + Send + Sync {
    /// Submits the mint call for an accepted deposit.
    async fn submit_mint(&self, deposit: &SubmittingDeposit) -> CapabilityResult<MintReceipt>;

    /// Submits the burn for a session, or resumes tracking it if `resume` names an existing
    /// burn transaction.
    async fn submit_burn(
        &self,
        session: &BurnSession,
        resume: Option<&TxHash>,
    ) -> CapabilityResult<Subscription<BurnProgress>>;
}
