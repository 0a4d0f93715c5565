//! The staged record of a single deposit observed on the source chain.
//!
//! Each stage is a strict superset of the one before it: a later stage wraps the earlier stage's
//! record and adds the fields that became known at that point. The only way to reach a later
//! stage is through the forward-only upgrade methods on each stage, so a record can never skip a
//! field that an earlier stage requires.

use serde::{Deserialize, Serialize};

use crate::types::{CustomParams, Timestamp, TxHash};

/// A deposit that has just been seen on the source chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedDeposit {
    /// Hash of the deposit transaction on the source chain. Unique within a session.
    pub source_tx_hash: TxHash,
    /// When the deposit was first detected.
    pub detected_at: Timestamp,
    /// The amount locked by the deposit, in the source asset's smallest unit.
    pub source_tx_amount: String,
    /// The chain-specific raw transaction, as reported by the source chain.
    #[serde(default)]
    pub raw_source_tx: serde_json::Value,
    /// The last error reported while processing this deposit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectedDeposit {
    /// Upgrades to a [`ConfirmingDeposit`] with the given confirmation count and target.
    pub fn confirming(self, confs: u64, target: Option<u64>) -> ConfirmingDeposit {
        ConfirmingDeposit {
            detected: self,
            source_tx_confs: confs,
            source_tx_conf_target: target,
        }
    }
}

/// A deposit whose confirmations on the source chain are being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmingDeposit {
    /// The detection record.
    #[serde(flatten)]
    pub detected: DetectedDeposit,
    /// The highest confirmation count observed so far.
    pub source_tx_confs: u64,
    /// The number of confirmations required, if already known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tx_conf_target: Option<u64>,
}

impl ConfirmingDeposit {
    /// Whether the deposit has reached a known confirmation target.
    ///
    /// An unknown target never counts as settled.
    pub fn is_settled(&self) -> bool {
        self.source_tx_conf_target
            .is_some_and(|target| self.source_tx_confs >= target)
    }

    /// Raises the confirmation count and target to the given values, never lowering either.
    ///
    /// Returns whether anything changed.
    pub fn raise_confirmations(&mut self, confs: u64, target: Option<u64>) -> bool {
        let new_confs = self.source_tx_confs.max(confs);
        let new_target = self.source_tx_conf_target.max(target);
        let changed =
            new_confs != self.source_tx_confs || new_target != self.source_tx_conf_target;

        self.source_tx_confs = new_confs;
        self.source_tx_conf_target = new_target;

        changed
    }

    /// Upgrades to an [`AcceptedDeposit`] once the protocol has signed the deposit.
    pub fn accept(self, ren_vm_hash: String, ren_signature: String) -> AcceptedDeposit {
        AcceptedDeposit {
            confirming: self,
            ren_vm_hash,
            ren_signature,
        }
    }
}

/// A deposit that the protocol has accepted and signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedDeposit {
    /// The confirmation record.
    #[serde(flatten)]
    pub confirming: ConfirmingDeposit,
    /// The protocol's acceptance hash for this deposit.
    #[serde(rename = "renVMHash")]
    pub ren_vm_hash: String,
    /// The protocol's signature authorizing the mint.
    pub ren_signature: String,
}

impl AcceptedDeposit {
    /// Upgrades to a [`SubmittingDeposit`] carrying the destination-call parameters.
    pub fn submit(self, contract_params: CustomParams) -> SubmittingDeposit {
        SubmittingDeposit {
            accepted: self,
            contract_params,
        }
    }
}

/// A deposit whose mint call is being submitted to the destination chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittingDeposit {
    /// The acceptance record.
    #[serde(flatten)]
    pub accepted: AcceptedDeposit,
    /// Parameters of the destination contract call.
    #[serde(default)]
    pub contract_params: CustomParams,
}

impl SubmittingDeposit {
    /// Upgrades to a [`MintedDeposit`] once the destination chain returned a transaction.
    pub fn mint(self, dest_tx_hash: TxHash, dest_tx_amount: Option<String>) -> MintedDeposit {
        MintedDeposit {
            submitting: self,
            dest_tx_hash,
            dest_tx_amount,
        }
    }
}

/// A deposit whose mint transaction has been broadcast on the destination chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedDeposit {
    /// The submission record.
    #[serde(flatten)]
    pub submitting: SubmittingDeposit,
    /// Hash of the mint transaction on the destination chain.
    pub dest_tx_hash: TxHash,
    /// The minted amount, once finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_tx_amount: Option<String>,
}

impl MintedDeposit {
    /// Upgrades to a [`CompletedDeposit`] stamped with the acknowledgement time.
    pub fn complete(self, completed_at: Timestamp) -> CompletedDeposit {
        CompletedDeposit {
            minted: self,
            completed_at,
        }
    }
}

/// A deposit whose mint result has been acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDeposit {
    /// The mint record.
    #[serde(flatten)]
    pub minted: MintedDeposit,
    /// When the result was acknowledged.
    pub completed_at: Timestamp,
}

/// The lifecycle stage of a [`DepositTransaction`], ordered from least to most advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepositStage {
    /// See [`DetectedDeposit`].
    Detected,
    /// See [`ConfirmingDeposit`].
    Confirming,
    /// See [`AcceptedDeposit`].
    Accepted,
    /// See [`SubmittingDeposit`].
    Submitting,
    /// See [`MintedDeposit`].
    Minted,
    /// See [`CompletedDeposit`].
    Completed,
}

/// A deposit record at any stage of its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum DepositTransaction {
    /// See [`DetectedDeposit`].
    Detected(DetectedDeposit),
    /// See [`ConfirmingDeposit`].
    Confirming(ConfirmingDeposit),
    /// See [`AcceptedDeposit`].
    Accepted(AcceptedDeposit),
    /// See [`SubmittingDeposit`].
    Submitting(SubmittingDeposit),
    /// See [`MintedDeposit`].
    Minted(MintedDeposit),
    /// See [`CompletedDeposit`].
    Completed(CompletedDeposit),
}

impl DepositTransaction {
    /// Returns the stage of this record.
    pub const fn stage(&self) -> DepositStage {
        match self {
            DepositTransaction::Detected(_) => DepositStage::Detected,
            DepositTransaction::Confirming(_) => DepositStage::Confirming,
            DepositTransaction::Accepted(_) => DepositStage::Accepted,
            DepositTransaction::Submitting(_) => DepositStage::Submitting,
            DepositTransaction::Minted(_) => DepositStage::Minted,
            DepositTransaction::Completed(_) => DepositStage::Completed,
        }
    }

    /// Returns the detection fields that every stage carries.
    pub const fn detected(&self) -> &DetectedDeposit {
        match self {
            DepositTransaction::Detected(detected) => detected,
            DepositTransaction::Confirming(confirming) => &confirming.detected,
            DepositTransaction::Accepted(accepted) => &accepted.confirming.detected,
            DepositTransaction::Submitting(submitting) => &submitting.accepted.confirming.detected,
            DepositTransaction::Minted(minted) => &minted.submitting.accepted.confirming.detected,
            DepositTransaction::Completed(completed) => {
                &completed.minted.submitting.accepted.confirming.detected
            }
        }
    }

    fn detected_mut(&mut self) -> &mut DetectedDeposit {
        match self {
            DepositTransaction::Detected(detected) => detected,
            DepositTransaction::Confirming(confirming) => &mut confirming.detected,
            DepositTransaction::Accepted(accepted) => &mut accepted.confirming.detected,
            DepositTransaction::Submitting(submitting) => {
                &mut submitting.accepted.confirming.detected
            }
            DepositTransaction::Minted(minted) => {
                &mut minted.submitting.accepted.confirming.detected
            }
            DepositTransaction::Completed(completed) => {
                &mut completed.minted.submitting.accepted.confirming.detected
            }
        }
    }

    /// Returns the confirmation fields, if the record has reached the confirming stage.
    pub const fn confirming(&self) -> Option<&ConfirmingDeposit> {
        match self {
            DepositTransaction::Detected(_) => None,
            DepositTransaction::Confirming(confirming) => Some(confirming),
            DepositTransaction::Accepted(accepted) => Some(&accepted.confirming),
            DepositTransaction::Submitting(submitting) => Some(&submitting.accepted.confirming),
            DepositTransaction::Minted(minted) => Some(&minted.submitting.accepted.confirming),
            DepositTransaction::Completed(completed) => {
                Some(&completed.minted.submitting.accepted.confirming)
            }
        }
    }

    fn confirming_mut(&mut self) -> Option<&mut ConfirmingDeposit> {
        match self {
            DepositTransaction::Detected(_) => None,
            DepositTransaction::Confirming(confirming) => Some(confirming),
            DepositTransaction::Accepted(accepted) => Some(&mut accepted.confirming),
            DepositTransaction::Submitting(submitting) => {
                Some(&mut submitting.accepted.confirming)
            }
            DepositTransaction::Minted(minted) => Some(&mut minted.submitting.accepted.confirming),
            DepositTransaction::Completed(completed) => {
                Some(&mut completed.minted.submitting.accepted.confirming)
            }
        }
    }

    /// Returns the acceptance fields, if the protocol has signed this deposit.
    pub const fn accepted(&self) -> Option<&AcceptedDeposit> {
        match self {
            DepositTransaction::Detected(_) | DepositTransaction::Confirming(_) => None,
            DepositTransaction::Accepted(accepted) => Some(accepted),
            DepositTransaction::Submitting(submitting) => Some(&submitting.accepted),
            DepositTransaction::Minted(minted) => Some(&minted.submitting.accepted),
            DepositTransaction::Completed(completed) => Some(&completed.minted.submitting.accepted),
        }
    }

    /// Returns the mint fields, if the destination chain has reported a transaction.
    pub const fn minted(&self) -> Option<&MintedDeposit> {
        match self {
            DepositTransaction::Minted(minted) => Some(minted),
            DepositTransaction::Completed(completed) => Some(&completed.minted),
            _ => None,
        }
    }

    /// Returns the hash of the deposit on the source chain.
    pub const fn source_tx_hash(&self) -> &TxHash {
        &self.detected().source_tx_hash
    }

    /// Returns the last error recorded for this deposit.
    pub fn error(&self) -> Option<&str> {
        self.detected().error.as_deref()
    }

    /// Returns `(confirmations, target)` if the record has reached the confirming stage.
    pub fn confirmations(&self) -> Option<(u64, Option<u64>)> {
        self.confirming()
            .map(|c| (c.source_tx_confs, c.source_tx_conf_target))
    }

    /// Whether the deposit reached a known confirmation target.
    pub fn is_settled(&self) -> bool {
        self.confirming().is_some_and(ConfirmingDeposit::is_settled)
    }

    /// Whether the protocol has signed this deposit.
    pub fn is_accepted(&self) -> bool {
        self.accepted()
            .is_some_and(|accepted| !accepted.ren_signature.is_empty())
    }

    /// Whether the destination chain has reported a mint transaction.
    pub fn is_minted(&self) -> bool {
        self.stage() >= DepositStage::Minted
    }

    /// Whether the mint result has been acknowledged.
    pub fn is_completed(&self) -> bool {
        self.stage() == DepositStage::Completed
    }

    /// Replaces the recorded error.
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.detected_mut().error = error;
        self
    }

    /// Whether applying `(confs, target)` would change this record.
    pub fn raises_confirmations(&self, confs: u64, target: Option<u64>) -> bool {
        match self.confirming() {
            None => true,
            Some(confirming) => {
                confs > confirming.source_tx_confs || target > confirming.source_tx_conf_target
            }
        }
    }

    /// Applies a confirmation report.
    ///
    /// Both the count and the target only ever grow, so stale or re-delivered reports are
    /// harmless. A detected record is upgraded to the confirming stage.
    pub fn with_confirmations(self, confs: u64, target: Option<u64>) -> Self {
        match self {
            DepositTransaction::Detected(detected) => {
                DepositTransaction::Confirming(detected.confirming(confs, target))
            }
            mut record => {
                if let Some(confirming) = record.confirming_mut() {
                    confirming.raise_confirmations(confs, target);
                }
                record
            }
        }
    }

    /// Merges a record for the same deposit reported from elsewhere.
    ///
    /// The more advanced stage wins (`other` on a tie) and confirmations from both sides are
    /// combined with [`Self::with_confirmations`].
    pub fn merge(self, other: DepositTransaction) -> Self {
        let (base, rest) = if other.stage() >= self.stage() {
            (other, self)
        } else {
            (self, other)
        };

        match rest.confirmations() {
            Some((confs, target)) => base.with_confirmations(confs, target),
            None => base,
        }
    }

    /// Produces the submission record for a (re-)claim with the given contract parameters.
    ///
    /// A record that was already submitted or minted is rolled back to its submission fields
    /// with the new parameters. Records below the accepted stage and completed records are
    /// returned unchanged as the error.
    pub fn into_submitting(self, contract_params: CustomParams) -> Result<SubmittingDeposit, Self> {
        match self {
            DepositTransaction::Accepted(accepted) => Ok(accepted.submit(contract_params)),
            DepositTransaction::Submitting(submitting) => {
                Ok(submitting.accepted.submit(contract_params))
            }
            DepositTransaction::Minted(minted) => {
                Ok(minted.submitting.accepted.submit(contract_params))
            }
            other => Err(other),
        }
    }
}

impl From<DetectedDeposit> for DepositTransaction {
    fn from(value: DetectedDeposit) -> Self {
        DepositTransaction::Detected(value)
    }
}

impl From<ConfirmingDeposit> for DepositTransaction {
    fn from(value: ConfirmingDeposit) -> Self {
        DepositTransaction::Confirming(value)
    }
}

impl From<AcceptedDeposit> for DepositTransaction {
    fn from(value: AcceptedDeposit) -> Self {
        DepositTransaction::Accepted(value)
    }
}

impl From<SubmittingDeposit> for DepositTransaction {
    fn from(value: SubmittingDeposit) -> Self {
        DepositTransaction::Submitting(value)
    }
}

impl From<MintedDeposit> for DepositTransaction {
    fn from(value: MintedDeposit) -> Self {
        DepositTransaction::Minted(value)
    }
}

impl From<CompletedDeposit> for DepositTransaction {
    fn from(value: CompletedDeposit) -> Self {
        DepositTransaction::Completed(value)
    }
}
