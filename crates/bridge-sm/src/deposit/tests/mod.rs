//! Testing utilities specific to the Deposit State Machine.
//!
//! This module provides record fixtures, helpers and `Arbitrary` implementations shared by the
//! transition tests of the DepositSM.


use proptest::prelude::*;
use ren_gateway_primitives::{
    deposit::{
        AcceptedDeposit, CompletedDeposit, ConfirmingDeposit, DepositTransaction,
        DetectedDeposit, MintedDeposit, SubmittingDeposit,
    },
    types::{CustomParams, Timestamp},
};
use serde_json::json;

use crate::{
    deposit::{events::DepositEvent, machine::DepositSM, state::DepositState},
    signals::{DepositSignal, DepositToGateway},
    testing::{EventSequence, InvalidTransition, TestMachine, Transition},
};

// ===== Test Constants =====

/// Source transaction hash of the deposit under test.
pub(super) const TEST_HASH: &str = "abc";
/// Confirmation target of the deposit under test.
pub(super) const TEST_TARGET: u64 = 6;
/// Destination transaction hash reported for the mint.
pub(super) const TEST_DEST_HASH: &str = "0xdef";
/// Acknowledgement time used in tests.
pub(super) const COMPLETED_AT: Timestamp = 1_700_000_000_000;

// ===== Record Fixtures =====

pub(super) fn detected() -> DetectedDeposit {
    DetectedDeposit {
        source_tx_hash: TEST_HASH.to_string(),
        detected_at: 1_000,
        source_tx_amount: "50000".to_string(),
        raw_source_tx: json!({ "txid": TEST_HASH, "vout": 0 }),
        error: None,
    }
}

pub(super) fn confirming(confs: u64, target: Option<u64>) -> ConfirmingDeposit {
    detected().confirming(confs, target)
}

pub(super) fn accepted() -> AcceptedDeposit {
    confirming(TEST_TARGET, Some(TEST_TARGET)).accept("ren-hash".to_string(), "sig".to_string())
}

pub(super) fn test_params() -> CustomParams {
    CustomParams::from([("nonce".to_string(), json!(7))])
}

pub(super) fn submitting() -> SubmittingDeposit {
    accepted().submit(test_params())
}

pub(super) fn minted() -> MintedDeposit {
    submitting().mint(TEST_DEST_HASH.to_string(), Some("49000".to_string()))
}

pub(super) fn completed() -> CompletedDeposit {
    minted().complete(COMPLETED_AT)
}

/// Returns a record that is consistent with a deposit sitting in `state`.
pub(super) fn record_for(state: DepositState) -> DepositTransaction {
    match state {
        DepositState::CheckingCompletion
        | DepositState::RestoringDeposit
        | DepositState::ErrorRestoring => detected().into(),
        DepositState::SrcSettling => confirming(1, Some(TEST_TARGET)).into(),
        DepositState::SrcConfirmed | DepositState::ErrorAccepting => {
            confirming(TEST_TARGET, Some(TEST_TARGET)).into()
        }
        DepositState::Accepted | DepositState::Rejected => accepted().into(),
        DepositState::Claiming | DepositState::ErrorSubmitting => submitting().into(),
        DepositState::DestInitiated => minted().into(),
        DepositState::Completed => completed().into(),
    }
}

// ===== State Machine Helpers =====

/// Creates a DepositSM in the given state holding a consistent record.
pub(super) fn create_sm(state: DepositState) -> DepositSM {
    DepositSM {
        record: record_for(state),
        state,
    }
}

impl TestMachine for DepositSM {
    type State = DepositState;

    fn in_state(state: DepositState) -> Self {
        create_sm(state)
    }

    fn current(&self) -> &DepositState {
        self.state()
    }
}

/// Wraps a gateway-bound signal.
pub(super) fn to_gateway(signal: DepositToGateway) -> DepositSignal {
    DepositSignal::ToGateway(signal)
}

/// Shorthand for an [`DepositToGateway::Update`] signal.
pub(super) fn update(deposit: impl Into<DepositTransaction>) -> DepositSignal {
    to_gateway(DepositToGateway::Update {
        deposit: deposit.into(),
    })
}

/// Type alias for DepositSM transitions.
pub(super) type DepositTransition = Transition<DepositSM>;

/// Type alias for invalid DepositSM transitions.
pub(super) type DepositInvalidTransition = InvalidTransition<DepositSM>;

/// Test a valid DepositSM transition.
pub(super) fn test_deposit_transition(transition: DepositTransition) {
    crate::testing::test_transition::<DepositSM>((), transition);
}

/// Test an invalid DepositSM transition.
pub(super) fn test_deposit_invalid_transition(invalid: DepositInvalidTransition) {
    crate::testing::test_invalid_transition::<DepositSM>((), invalid);
}

/// Creates an event sequence starting from a freshly spawned deposit.
pub(super) fn fresh_sequence(record: DepositTransaction) -> EventSequence<DepositSM> {
    EventSequence::new(DepositSM::new(record))
}

// ===== Arbitrary Implementations =====

/// All deposit states.
pub(super) const ALL_STATES: [DepositState; 12] = [
    DepositState::CheckingCompletion,
    DepositState::RestoringDeposit,
    DepositState::ErrorRestoring,
    DepositState::SrcSettling,
    DepositState::SrcConfirmed,
    DepositState::Accepted,
    DepositState::ErrorAccepting,
    DepositState::Claiming,
    DepositState::ErrorSubmitting,
    DepositState::DestInitiated,
    DepositState::Completed,
    DepositState::Rejected,
];

impl Arbitrary for DepositState {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(ALL_STATES.to_vec()).boxed()
    }
}

/// Generates a record for the deposit under test at any stage.
pub(super) fn arb_record() -> impl Strategy<Value = DepositTransaction> {
    let confs = 0u64..12;
    let target = proptest::option::of(1u64..10);

    prop_oneof![
        Just(DepositTransaction::from(detected())),
        (confs, target).prop_map(|(c, t)| confirming(c, t).into()),
        Just(DepositTransaction::from(accepted())),
        Just(DepositTransaction::from(submitting())),
        Just(DepositTransaction::from(minted())),
        Just(DepositTransaction::from(completed())),
    ]
}

/// Generates a machine with an arbitrary state and record, consistent or not.
pub(super) fn arb_machine() -> impl Strategy<Value = DepositSM> {
    (any::<DepositState>(), arb_record()).prop_map(|(state, record)| DepositSM { record, state })
}

/// Generates a machine in a terminal state.
pub(super) fn arb_terminal_machine() -> impl Strategy<Value = DepositSM> {
    let terminal: Vec<_> = ALL_STATES.into_iter().filter(DepositState::is_terminal).collect();

    (proptest::sample::select(terminal), arb_record())
        .prop_map(|(state, record)| DepositSM { record, state })
}

impl Arbitrary for DepositEvent {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        let error = "[a-z]{1,8}";
        let confs = 0u64..12;

        let restore = prop_oneof![
            Just(DepositEvent::Check),
            (arb_record(), any::<bool>())
                .prop_map(|(deposit, is_final)| DepositEvent::Restored { deposit, is_final }),
            error.prop_map(|error| DepositEvent::Error { error }),
            (confs.clone(), proptest::option::of(1u64..10))
                .prop_map(|(confs, target)| DepositEvent::Confirmation { confs, target }),
            (confs, 1u64..10).prop_map(|(confs, target)| DepositEvent::Confirmed { confs, target }),
            Just(DepositEvent::Signed {
                ren_vm_hash: "ren-hash".to_string(),
                ren_signature: "sig".to_string(),
            }),
            error.prop_map(|error| DepositEvent::SignError { error }),
            error.prop_map(|reason| DepositEvent::Reverted { reason }),
        ];
        let claim = prop_oneof![
            Just(DepositEvent::Claim {
                params: test_params()
            }),
            Just(DepositEvent::Reject),
            Just(DepositEvent::Submitted {
                dest_tx_hash: TEST_DEST_HASH.to_string(),
                dest_tx_amount: None,
            }),
            error.prop_map(|error| DepositEvent::SubmitError { error }),
            Just(DepositEvent::Acknowledge { at: COMPLETED_AT }),
        ];

        prop_oneof![restore, claim].boxed()
    }
}
