//! The persisted record of a burn-and-release transfer intent.

use serde::{Deserialize, Serialize};

use crate::types::{CustomParams, Network, Timestamp, TxHash};

/// A burn that has been submitted on the host chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedBurn {
    /// Hash of the burn transaction on the host chain.
    pub source_tx_hash: TxHash,
    /// When the burn was first observed.
    pub detected_at: Timestamp,
    /// The amount burned.
    pub source_tx_amount: String,
    /// The highest confirmation count observed so far.
    pub source_tx_confs: u64,
    /// The number of confirmations required.
    pub source_tx_conf_target: u64,
}

impl SubmittedBurn {
    /// Upgrades to a [`ConfirmedBurn`] carrying the protocol's hash for the burn.
    pub fn confirm(self, ren_vm_hash: String) -> ConfirmedBurn {
        ConfirmedBurn {
            submitted: self,
            ren_vm_hash,
        }
    }
}

/// A burn that reached its confirmation target and is known to the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBurn {
    /// The submission record.
    #[serde(flatten)]
    pub submitted: SubmittedBurn,
    /// The protocol's hash for this burn.
    #[serde(rename = "renVMHash")]
    pub ren_vm_hash: String,
}

impl ConfirmedBurn {
    /// Upgrades to a [`ReleasedBurn`] once the protocol answered the release request.
    pub fn release(
        self,
        dest_tx_hash: Option<TxHash>,
        ren_response: serde_json::Value,
    ) -> ReleasedBurn {
        ReleasedBurn {
            confirmed: self,
            dest_tx_hash,
            ren_response,
        }
    }
}

/// A burn whose release was answered by the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedBurn {
    /// The confirmation record.
    #[serde(flatten)]
    pub confirmed: ConfirmedBurn,
    /// Hash of the release transaction on the native chain, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_tx_hash: Option<TxHash>,
    /// The protocol's raw response to the release request.
    pub ren_response: serde_json::Value,
}

impl ReleasedBurn {
    /// Upgrades to a [`CompletedBurn`] once the released amount is known.
    pub fn complete(self, dest_tx_amount: String, completed_at: Timestamp) -> CompletedBurn {
        CompletedBurn {
            released: self,
            dest_tx_amount,
            completed_at,
        }
    }
}

/// A burn whose release transaction was observed on the native chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedBurn {
    /// The release record.
    #[serde(flatten)]
    pub released: ReleasedBurn,
    /// The amount released.
    pub dest_tx_amount: String,
    /// When the release was observed.
    pub completed_at: Timestamp,
}

/// The lifecycle stage of a [`BurnTransaction`], ordered from least to most advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BurnStage {
    /// See [`SubmittedBurn`].
    Submitted,
    /// See [`ConfirmedBurn`].
    Confirmed,
    /// See [`ReleasedBurn`].
    Released,
    /// See [`CompletedBurn`].
    Completed,
}

/// A burn record at any stage of its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum BurnTransaction {
    /// See [`SubmittedBurn`].
    Submitted(SubmittedBurn),
    /// See [`ConfirmedBurn`].
    Confirmed(ConfirmedBurn),
    /// See [`ReleasedBurn`].
    Released(ReleasedBurn),
    /// See [`CompletedBurn`].
    Completed(CompletedBurn),
}

impl BurnTransaction {
    /// Returns the stage of this record.
    pub const fn stage(&self) -> BurnStage {
        match self {
            BurnTransaction::Submitted(_) => BurnStage::Submitted,
            BurnTransaction::Confirmed(_) => BurnStage::Confirmed,
            BurnTransaction::Released(_) => BurnStage::Released,
            BurnTransaction::Completed(_) => BurnStage::Completed,
        }
    }

    /// Returns the submission fields that every stage carries.
    pub const fn submitted(&self) -> &SubmittedBurn {
        match self {
            BurnTransaction::Submitted(submitted) => submitted,
            BurnTransaction::Confirmed(confirmed) => &confirmed.submitted,
            BurnTransaction::Released(released) => &released.confirmed.submitted,
            BurnTransaction::Completed(completed) => &completed.released.confirmed.submitted,
        }
    }

    fn submitted_mut(&mut self) -> &mut SubmittedBurn {
        match self {
            BurnTransaction::Submitted(submitted) => submitted,
            BurnTransaction::Confirmed(confirmed) => &mut confirmed.submitted,
            BurnTransaction::Released(released) => &mut released.confirmed.submitted,
            BurnTransaction::Completed(completed) => &mut completed.released.confirmed.submitted,
        }
    }

    /// Returns the hash of the burn on the host chain.
    pub const fn source_tx_hash(&self) -> &TxHash {
        &self.submitted().source_tx_hash
    }

    /// Returns `(confirmations, target)`.
    pub const fn confirmations(&self) -> (u64, u64) {
        let submitted = self.submitted();
        (submitted.source_tx_confs, submitted.source_tx_conf_target)
    }

    /// Returns the protocol's hash for the burn, once confirmed.
    pub fn ren_vm_hash(&self) -> Option<&str> {
        match self {
            BurnTransaction::Submitted(_) => None,
            BurnTransaction::Confirmed(confirmed) => Some(confirmed.ren_vm_hash.as_str()),
            BurnTransaction::Released(released) => Some(released.confirmed.ren_vm_hash.as_str()),
            BurnTransaction::Completed(completed) => {
                Some(completed.released.confirmed.ren_vm_hash.as_str())
            }
        }
    }

    /// Returns the protocol's release response, once released.
    pub const fn ren_response(&self) -> Option<&serde_json::Value> {
        match self {
            BurnTransaction::Submitted(_) | BurnTransaction::Confirmed(_) => None,
            BurnTransaction::Released(released) => Some(&released.ren_response),
            BurnTransaction::Completed(completed) => Some(&completed.released.ren_response),
        }
    }

    /// Whether the protocol has answered the release request.
    pub fn is_dest_initiated(&self) -> bool {
        self.ren_response().is_some_and(|response| !response.is_null())
    }

    /// Whether applying `(confs, target)` would change this record.
    pub const fn raises_confirmations(&self, confs: u64, target: u64) -> bool {
        let (current_confs, current_target) = self.confirmations();
        confs > current_confs || target > current_target
    }

    /// Applies a confirmation report, keeping the larger count and target.
    pub fn with_confirmations(mut self, confs: u64, target: u64) -> Self {
        let submitted = self.submitted_mut();
        submitted.source_tx_confs = submitted.source_tx_confs.max(confs);
        submitted.source_tx_conf_target = submitted.source_tx_conf_target.max(target);
        self
    }

    /// Records the protocol's hash for the burn.
    ///
    /// A submitted record is upgraded to [`ConfirmedBurn`]; a confirmed one has its hash
    /// replaced. Released and completed records are returned unchanged.
    pub fn accept(self, ren_vm_hash: String) -> Self {
        match self {
            BurnTransaction::Submitted(submitted) => {
                BurnTransaction::Confirmed(submitted.confirm(ren_vm_hash))
            }
            BurnTransaction::Confirmed(mut confirmed) => {
                confirmed.ren_vm_hash = ren_vm_hash;
                BurnTransaction::Confirmed(confirmed)
            }
            other => other,
        }
    }

    /// Records the protocol's answer to the release request.
    ///
    /// `completion` carries the released amount and the observation time when the release
    /// transaction itself has been seen. Records below the confirmed stage are returned as the
    /// error.
    pub fn release(
        self,
        dest_tx_hash: Option<TxHash>,
        ren_response: serde_json::Value,
        completion: Option<(String, Timestamp)>,
    ) -> Result<Self, Self> {
        let confirmed = match self {
            BurnTransaction::Submitted(_) => return Err(self),
            BurnTransaction::Confirmed(confirmed) => confirmed,
            BurnTransaction::Released(released) => released.confirmed,
            BurnTransaction::Completed(completed) => completed.released.confirmed,
        };

        let released = confirmed.release(dest_tx_hash, ren_response);
        Ok(match completion {
            Some((amount, at)) => BurnTransaction::Completed(released.complete(amount, at)),
            None => BurnTransaction::Released(released),
        })
    }
}

impl From<SubmittedBurn> for BurnTransaction {
    fn from(value: SubmittedBurn) -> Self {
        BurnTransaction::Submitted(value)
    }
}

/// One burn intent together with its single burn record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnSession {
    /// Opaque unique identifier of the session.
    pub id: String,
    /// The protocol deployment this session runs against.
    pub network: Network,
    /// Name of the host chain the wrapped asset is burned on.
    pub source_chain: String,
    /// Name of the native chain the asset is released on.
    pub dest_chain: String,
    /// The asset being burned.
    pub source_asset: String,
    /// Recipient of the released asset on the native chain.
    pub dest_address: String,
    /// The user that owns this session.
    pub user_address: String,
    /// The amount to burn.
    pub target_amount: String,
    /// Free-form parameters supplied by the caller.
    #[serde(default)]
    pub custom_params: CustomParams,
    /// The burn record, once the burn has been submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<BurnTransaction>,
    /// The last session-level error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BurnSession {
    /// Whether the protocol has already answered the release request.
    pub fn is_dest_initiated(&self) -> bool {
        self.transaction
            .as_ref()
            .is_some_and(BurnTransaction::is_dest_initiated)
    }

    /// Whether a burn transaction is known for this session.
    pub fn is_submitted(&self) -> bool {
        self.transaction
            .as_ref()
            .is_some_and(|tx| !tx.source_tx_hash().is_empty())
    }

    /// Returns the hash of the burn on the host chain, if known.
    pub fn source_tx_hash(&self) -> Option<&TxHash> {
        self.transaction.as_ref().map(BurnTransaction::source_tx_hash)
    }

    /// Returns this session with the given error recorded.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn submitted() -> BurnTransaction {
        SubmittedBurn {
            source_tx_hash: "h1".to_string(),
            detected_at: 1,
            source_tx_amount: "100".to_string(),
            source_tx_confs: 0,
            source_tx_conf_target: 2,
        }
        .into()
    }

    #[test]
    fn confirmations_never_regress() {
        let record = submitted()
            .with_confirmations(3, 2)
            .with_confirmations(1, 2);

        assert_eq!(record.confirmations(), (3, 2));
        assert!(!record.raises_confirmations(2, 2));
        assert!(record.raises_confirmations(4, 2));
    }

    #[test]
    fn release_requires_a_confirmed_burn() {
        let record = submitted();

        let err = record
            .clone()
            .release(None, json!({ "ok": true }), None)
            .unwrap_err();
        assert_eq!(err, record);
    }

    #[test]
    fn release_with_completion_reaches_completed_stage() {
        let record = submitted()
            .accept("r1".to_string())
            .release(
                Some("0xabc".to_string()),
                json!({ "tx": "0xabc" }),
                Some(("99".to_string(), 5)),
            )
            .unwrap();

        assert_eq!(record.stage(), BurnStage::Completed);
        assert!(record.is_dest_initiated());
        assert_eq!(record.ren_vm_hash(), Some("r1"));
    }

    #[test]
    fn null_response_is_not_dest_initiated() {
        let record = submitted()
            .accept("r1".to_string())
            .release(None, serde_json::Value::Null, None)
            .unwrap();

        assert_eq!(record.stage(), BurnStage::Released);
        assert!(!record.is_dest_initiated());
    }

    #[test]
    fn serde_uses_stage_tag() {
        let record = submitted().accept("r1".to_string());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["stage"], "confirmed");
        assert_eq!(value["renVMHash"], "r1");
        assert_eq!(value["sourceTxConfTarget"], 2);

        let decoded: BurnTransaction = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, record);
    }
}
