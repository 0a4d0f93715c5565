//! Testing utilities specific to the Burn State Machine.

mod burn;

use std::sync::Arc;

use proptest::prelude::*;
use ren_gateway_primitives::{
    burn::{BurnSession, BurnTransaction, SubmittedBurn},
    types::{CustomParams, Network, Timestamp},
};
use serde_json::json;

use crate::{
    burn::{config::BurnSMCfg, events::BurnEvent, machine::BurnSM, state::BurnState},
    testing::{InvalidTransition, TestMachine, Transition},
};

// ===== Test Constants =====

/// The current time used throughout the burn tests.
pub(super) const TEST_NOW: Timestamp = 1_700_000_000_000;
/// Hash of the burn on the host chain.
pub(super) const TEST_BURN_HASH: &str = "h1";
/// The protocol's hash for the burn.
pub(super) const TEST_REN_VM_HASH: &str = "r1";
/// Hash of the release on the native chain.
pub(super) const TEST_RELEASE_HASH: &str = "0xabc";
/// Confirmations required by the host chain.
pub(super) const TEST_TARGET: u64 = 2;

// ===== Fixtures =====

/// A fresh burn session.
pub(super) fn burn_session() -> BurnSession {
    BurnSession {
        id: "burn-session-1".to_string(),
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

/// The burn as broadcast on the host chain.
pub(super) fn submitted_burn() -> SubmittedBurn {
    SubmittedBurn {
        source_tx_hash: TEST_BURN_HASH.to_string(),
        detected_at: TEST_NOW,
        source_tx_amount: "50000".to_string(),
        source_tx_confs: 0,
        source_tx_conf_target: TEST_TARGET,
    }
}

/// The protocol's response to the release request.
pub(super) fn ren_response() -> serde_json::Value {
    json!({ "txHash": TEST_RELEASE_HASH, "status": "done" })
}

/// A record consistent with a session sitting in `state`.
pub(super) fn record_for(state: BurnState) -> Option<BurnTransaction> {
    let submitted = BurnTransaction::from(submitted_burn());

    match state {
        BurnState::Restoring
        | BurnState::Creating
        | BurnState::Created
        | BurnState::SubmittingBurn
        | BurnState::ErrorBurning => None,
        BurnState::SrcSettling => Some(submitted.with_confirmations(1, TEST_TARGET)),
        BurnState::SrcConfirmed => Some(submitted.with_confirmations(TEST_TARGET, TEST_TARGET)),
        BurnState::Accepted | BurnState::ErrorReleasing => Some(
            submitted
                .with_confirmations(TEST_TARGET, TEST_TARGET)
                .accept(TEST_REN_VM_HASH.to_string()),
        ),
        BurnState::DestInitiated => submitted
            .with_confirmations(TEST_TARGET, TEST_TARGET)
            .accept(TEST_REN_VM_HASH.to_string())
            .release(Some(TEST_RELEASE_HASH.to_string()), ren_response(), None)
            .ok(),
    }
}

/// The configuration used by most tests.
pub(super) fn test_cfg() -> Arc<BurnSMCfg> {
    Arc::new(BurnSMCfg { auto_submit: false })
}

// ===== State Machine Helpers =====

/// Creates a BurnSM in the given state holding a consistent record.
pub(super) fn create_sm(state: BurnState) -> BurnSM {
    BurnSM {
        tx: BurnSession {
            transaction: record_for(state),
            ..burn_session()
        },
        state,
    }
}

impl TestMachine for BurnSM {
    type State = BurnState;

    fn in_state(state: BurnState) -> Self {
        create_sm(state)
    }

    fn current(&self) -> &BurnState {
        self.state()
    }
}

/// Type alias for BurnSM transitions.
pub(super) type BurnTransition = Transition<BurnSM>;

/// Type alias for invalid BurnSM transitions.
pub(super) type BurnInvalidTransition = InvalidTransition<BurnSM>;

/// Test a valid BurnSM transition.
pub(super) fn test_burn_transition(transition: BurnTransition) {
    crate::testing::test_transition::<BurnSM>(test_cfg(), transition);
}

/// Test an invalid BurnSM transition.
pub(super) fn test_burn_invalid_transition(invalid: BurnInvalidTransition) {
    crate::testing::test_invalid_transition::<BurnSM>(test_cfg(), invalid);
}

// ===== Arbitrary Implementations =====

const ALL_STATES: [BurnState; 10] = [
    BurnState::Restoring,
    BurnState::Creating,
    BurnState::Created,
    BurnState::SubmittingBurn,
    BurnState::SrcSettling,
    BurnState::ErrorBurning,
    BurnState::SrcConfirmed,
    BurnState::Accepted,
    BurnState::ErrorReleasing,
    BurnState::DestInitiated,
];

impl Arbitrary for BurnState {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(ALL_STATES.to_vec()).boxed()
    }
}

/// Generates a machine with an arbitrary state and a record of any stage, consistent or not.
pub(super) fn arb_machine() -> impl Strategy<Value = BurnSM> {
    (any::<BurnState>(), any::<BurnState>()).prop_map(|(state, record_state)| BurnSM {
        tx: BurnSession {
            transaction: record_for(record_state),
            ..burn_session()
        },
        state,
    })
}

/// Generates a machine in a terminal state.
pub(super) fn arb_terminal_machine() -> impl Strategy<Value = BurnSM> {
    (
        prop_oneof![Just(BurnState::ErrorBurning), Just(BurnState::DestInitiated)],
        arb_machine(),
    )
        .prop_map(|(state, mut sm)| {
            sm.state = state;
            sm
        })
}

impl Arbitrary for BurnEvent {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        let commands = prop_oneof![
            Just(BurnEvent::Restore),
            Just(BurnEvent::Created),
            Just(BurnEvent::Submit),
            Just(BurnEvent::Retry),
            "[a-z]{1,8}".prop_map(|error| BurnEvent::BurnError { error }),
            "[a-z]{1,8}".prop_map(|error| BurnEvent::ReleaseError { error }),
        ];
        let progress = prop_oneof![
            prop_oneof![Just(TEST_BURN_HASH), Just("h2")].prop_map(|hash| BurnEvent::Submitted {
                burn: SubmittedBurn {
                    source_tx_hash: hash.to_string(),
                    ..submitted_burn()
                }
            }),
            (0u64..4, 1u64..4)
                .prop_map(|(confs, target)| BurnEvent::Confirmation { confs, target }),
            (0u64..4, 1u64..4).prop_map(|(confs, target)| BurnEvent::Confirmed { confs, target }),
            prop_oneof![Just(TEST_REN_VM_HASH), Just("r2")].prop_map(|hash| {
                BurnEvent::Accepted {
                    ren_vm_hash: hash.to_string(),
                }
            }),
            (
                proptest::option::of(Just(TEST_RELEASE_HASH.to_string())),
                prop_oneof![Just(ren_response()), Just(serde_json::Value::Null)],
                proptest::option::of(Just("49000".to_string())),
            )
                .prop_map(|(dest_tx_hash, ren_response, dest_tx_amount)| {
                    BurnEvent::Released {
                        dest_tx_hash,
                        ren_response,
                        dest_tx_amount,
                        completed_at: TEST_NOW,
                    }
                }),
        ];

        prop_oneof![commands, progress].boxed()
    }
}
