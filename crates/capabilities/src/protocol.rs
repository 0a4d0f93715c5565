//! The capability of the cross-chain protocol itself.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use ren_gateway_primitives::{
    burn::BurnSession,
    deposit::DepositTransaction,
    session::GatewaySession,
    subscription::Subscription,
    types::{Network, TxHash},
};

use crate::{dest::DestChain, errors::CapabilityResult, source::SourceChain};

/// The protocol's attestation of a deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositSignature {
    /// The protocol's hash for the deposit.
    pub ren_vm_hash: String,

    /// The signature that authorizes the mint.
    pub ren_signature: String,
}

/// What the protocol knows about a final burn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnDetails {
    /// The protocol's hash for the burn.
    pub ren_vm_hash: String,
}

/// Progress of a burn on the host chain.
#[derive(Debug, Clone, PartialEq)]
pub enum BurnProgress {
    /// The burn transaction was broadcast.
    TransactionHash {
        /// Hash of the burn transaction.
        source_tx_hash: TxHash,

        /// The amount burned.
        amount: String,
    },

    /// The burn gained confirmations.
    Confirmation {
        /// Current confirmation count.
        confs: u64,

        /// Required confirmation count.
        target: u64,
    },

    /// The burn is final. `None` if the protocol could not attach its details.
    Burned(Option<BurnDetails>),

    /// The burn was reverted.
    Reverted(String),
}

/// Progress of a release on the native chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseProgress {
    /// The protocol produced its hash for the release.
    RenVmHash(String),

    /// The release transaction was observed on the native chain.
    Transaction {
        /// Hash of the release transaction.
        dest_tx_hash: TxHash,

        /// The amount released.
        amount: String,
    },

    /// The protocol answered the release request.
    Released {
        /// Hash of the release transaction, if the protocol reported it.
        dest_tx_hash: Option<TxHash>,

        /// The protocol's raw response.
        ren_response: serde_json::Value,
    },

    /// The release failed.
    Failed(String),
}

/// Inputs for opening a burn-and-release operation.
#[derive(Debug, Clone)]
pub struct BurnAndReleaseParams {
    /// The asset being burned.
    pub asset: String,

    /// The session the burn belongs to.
    pub session: BurnSession,

    /// The host chain the burn happens on.
    pub from: Arc<dyn DestChain>,

    /// The native chain the release happens on.
    pub to: Arc<dyn SourceChain>,

    /// An existing burn to resume instead of submitting a new one.
    pub transaction: Option<TxHash>,
}

/// A single burn-and-release operation.
///
/// The host-chain burn and the release are driven separately: [`BurnAndRelease::burn`] must
/// report a final burn before [`BurnAndRelease::release`] can succeed.
#[async_trait]
pub trait BurnAndRelease: Debug + Send + Sync {
    /// Returns the number of confirmations the burn needs.
    async fn confirmation_target(&self) -> CapabilityResult<u64>;

    /// Submits (or resumes) the burn and reports its progress.
    async fn burn(&self) -> CapabilityResult<Subscription<BurnProgress>>;

    /// Requests the release and reports its progress.
    async fn release(&self) -> CapabilityResult<Subscription<ReleaseProgress>>;

    /// Detaches every listener registered on either chain.
    fn cancel(&self);
}

/// Handle to a deployment of the protocol.
#[async_trait]
pub trait RenProtocol: Debug + Send + Sync {
    /// The deployment this handle talks to.
    fn network(&self) -> Network;

    /// Submits a settled deposit and waits for the protocol's signature.
    ///
    /// A [`crate::CapabilityError::Reverted`] means the deposit is definitively rejected.
    async fn sign_deposit(
        &self,
        session: &GatewaySession,
        deposit: &DepositTransaction,
    ) -> CapabilityResult<DepositSignature>;

    /// Opens a burn-and-release operation.
    async fn burn_and_release(
        &self,
        params: BurnAndReleaseParams,
    ) -> CapabilityResult<Box<dyn BurnAndRelease>>;
}
