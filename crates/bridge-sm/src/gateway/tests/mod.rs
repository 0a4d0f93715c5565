//! Testing utilities specific to the Gateway State Machine.

mod prop_tests;

use std::collections::BTreeMap;

use proptest::prelude::*;
use ren_gateway_primitives::{
    deposit::{DepositTransaction, DetectedDeposit},
    session::GatewaySession,
    types::{CustomParams, Network, Timestamp},
};
use serde_json::json;

use crate::{
    deposit::{events::DepositEvent, machine::DepositSM, state::DepositState},
    gateway::{
        context::GatewaySMCtx, events::GatewayEvent, machine::GatewaySM, state::GatewayState,
    },
    testing::{EventSequence, InvalidTransition, TestMachine, Transition},
};

// ===== Test Constants =====

/// The current time used throughout the gateway tests.
pub(super) const TEST_NOW: Timestamp = 1_700_000_000_000;
/// Sessions expire an hour after [`TEST_NOW`].
pub(super) const TEST_EXPIRY: Timestamp = TEST_NOW + 3_600_000;
/// The deposit address handed out by the source chain.
pub(super) const TEST_GATEWAY_ADDRESS: &str = "tb1qgatewayaddress";
/// Hash of the deposit used in most tests.
pub(super) const TEST_HASH: &str = "abc";

// ===== Fixtures =====

/// A fresh session that has no deposit address yet.
pub(super) fn test_session() -> GatewaySession {
    GatewaySession {
        id: "mint-session-1".to_string(),
        network: Network::Testnet,
        source_chain: "bitcoin".to_string(),
        dest_chain: "ethereum".to_string(),
        source_asset: "BTC".to_string(),
        dest_address: "0x00000000000000000000000000000000000000aa".to_string(),
        user_address: "0x00000000000000000000000000000000000000bb".to_string(),
        expiry_time: TEST_EXPIRY,
        custom_params: CustomParams::new(),
        gateway_address: None,
        transactions: BTreeMap::new(),
        error: None,
    }
}

/// The session after the source chain allocated its address.
pub(super) fn opened_session() -> GatewaySession {
    GatewaySession {
        gateway_address: Some(TEST_GATEWAY_ADDRESS.to_string()),
        ..test_session()
    }
}

/// A deposit as first seen by the deposit watch.
pub(super) fn detected(hash: &str) -> DetectedDeposit {
    DetectedDeposit {
        source_tx_hash: hash.to_string(),
        detected_at: TEST_NOW,
        source_tx_amount: "100000".to_string(),
        raw_source_tx: json!({ "txid": hash }),
        error: None,
    }
}

/// A deposit with the given confirmations.
pub(super) fn confirming(hash: &str, confs: u64, target: Option<u64>) -> DepositTransaction {
    detected(hash).confirming(confs, target).into()
}

/// A signed deposit.
pub(super) fn signed(hash: &str) -> DepositTransaction {
    detected(hash)
        .confirming(2, Some(2))
        .accept("ren-hash".to_string(), "sig".to_string())
        .into()
}

/// An opened, listening session holding the given deposit records but no children yet.
pub(super) fn listening_with(records: impl IntoIterator<Item = DepositTransaction>) -> GatewaySM {
    let mut tx = opened_session();
    for record in records {
        tx.upsert_transaction(record);
    }

    GatewaySM {
        context: GatewaySMCtx::new(tx),
        state: GatewayState::Listening,
    }
}

/// A listening session whose deposit [`TEST_HASH`] is settling.
pub(super) fn settling_session() -> GatewaySM {
    let record = confirming(TEST_HASH, 0, Some(2));
    let mut sm = listening_with([record.clone()]);
    sm.context.deposits.insert(
        TEST_HASH.to_string(),
        DepositSM {
            record,
            state: DepositState::SrcSettling,
        },
    );
    sm
}

// ===== State Machine Helpers =====

/// Creates a GatewaySM in the given state. Only restoring and creating sessions lack an address.
pub(super) fn create_sm(state: GatewayState) -> GatewaySM {
    let tx = match state {
        GatewayState::Restoring | GatewayState::Creating => test_session(),
        _ => opened_session(),
    };

    GatewaySM {
        context: GatewaySMCtx::new(tx),
        state,
    }
}

impl TestMachine for GatewaySM {
    type State = GatewayState;

    fn in_state(state: GatewayState) -> Self {
        create_sm(state)
    }

    fn current(&self) -> &GatewayState {
        self.state()
    }
}

/// Wraps an event for one deposit.
pub(super) fn to_deposit(hash: &str, event: DepositEvent) -> GatewayEvent {
    GatewayEvent::ToDeposit {
        source_tx_hash: hash.to_string(),
        event,
    }
}

/// Type alias for GatewaySM transitions.
pub(super) type GatewayTransition = Transition<GatewaySM>;

/// Type alias for invalid GatewaySM transitions.
pub(super) type GatewayInvalidTransition = InvalidTransition<GatewaySM>;

/// Test a valid GatewaySM transition.
pub(super) fn test_gateway_transition(transition: GatewayTransition) {
    crate::testing::test_transition::<GatewaySM>((), transition);
}

/// Test an invalid GatewaySM transition.
pub(super) fn test_gateway_invalid_transition(invalid: GatewayInvalidTransition) {
    crate::testing::test_invalid_transition::<GatewaySM>((), invalid);
}

/// Creates an event sequence over the given machine.
pub(super) fn sequence(sm: GatewaySM) -> EventSequence<GatewaySM> {
    EventSequence::new(sm)
}

// ===== Arbitrary Implementations =====

const HASHES: [&str; 2] = [TEST_HASH, "def"];

fn arb_hash() -> impl Strategy<Value = String> {
    proptest::sample::select(HASHES.to_vec()).prop_map(str::to_string)
}

fn arb_record() -> impl Strategy<Value = DepositTransaction> {
    (arb_hash(), 0u64..4, proptest::option::of(1u64..4), any::<bool>()).prop_map(
        |(hash, confs, target, is_signed)| {
            if is_signed {
                signed(&hash)
            } else {
                confirming(&hash, confs, target)
            }
        },
    )
}

fn arb_child() -> impl Strategy<Value = DepositSM> {
    let states = vec![
        DepositState::RestoringDeposit,
        DepositState::SrcSettling,
        DepositState::SrcConfirmed,
        DepositState::Accepted,
        DepositState::Completed,
    ];

    (proptest::sample::select(states), arb_record())
        .prop_map(|(state, record)| DepositSM { record, state })
}

impl Arbitrary for GatewayState {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(GatewayState::Restoring),
            Just(GatewayState::Creating),
            Just(GatewayState::SrcInitializeError),
            Just(GatewayState::Listening),
            Just(GatewayState::Completed),
        ]
        .boxed()
    }
}

/// Generates a machine with recorded deposits and some spawned children.
pub(super) fn arb_machine() -> impl Strategy<Value = GatewaySM> {
    (
        any::<GatewayState>(),
        any::<bool>(),
        proptest::collection::vec(arb_record(), 0..3),
        proptest::collection::vec(arb_child(), 0..2),
    )
        .prop_map(|(state, opened, records, children)| {
            let mut tx = if opened {
                opened_session()
            } else {
                test_session()
            };
            for record in records {
                tx.upsert_transaction(record);
            }

            let mut context = GatewaySMCtx::new(tx);
            for child in children {
                context.tx.upsert_transaction(child.record.clone());
                if child.state == DepositState::Accepted {
                    context.mint_requests.insert(child.source_tx_hash().clone());
                }
                context
                    .deposits
                    .insert(child.source_tx_hash().clone(), child);
            }

            GatewaySM { context, state }
        })
}

/// Generates a machine in a terminal state.
pub(super) fn arb_terminal_machine() -> impl Strategy<Value = GatewaySM> {
    (
        prop_oneof![
            Just(GatewayState::SrcInitializeError),
            Just(GatewayState::Completed)
        ],
        arb_machine(),
    )
        .prop_map(|(state, mut sm)| {
            sm.state = state;
            sm
        })
}

fn arb_deposit_event() -> impl Strategy<Value = DepositEvent> {
    prop_oneof![
        Just(DepositEvent::Check),
        (arb_record(), any::<bool>())
            .prop_map(|(deposit, is_final)| DepositEvent::Restored { deposit, is_final }),
        (0u64..4, proptest::option::of(1u64..4))
            .prop_map(|(confs, target)| DepositEvent::Confirmation { confs, target }),
        Just(DepositEvent::Signed {
            ren_vm_hash: "ren-hash".to_string(),
            ren_signature: "sig".to_string(),
        }),
        Just(DepositEvent::Claim {
            params: CustomParams::new()
        }),
        Just(DepositEvent::Reject),
        Just(DepositEvent::SubmitError {
            error: "out of gas".to_string()
        }),
    ]
}

impl Arbitrary for GatewayEvent {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            prop_oneof![Just(TEST_NOW), Just(TEST_EXPIRY)]
                .prop_map(|now| GatewayEvent::Restore { now }),
            prop_oneof![Just(opened_session()), Just(test_session())]
                .prop_map(|session| GatewayEvent::GatewayCreated { session }),
            Just(GatewayEvent::GatewayCreationFailed {
                error: "rpc down".to_string()
            }),
            Just(GatewayEvent::ListenerReady),
            Just(GatewayEvent::WatchFailed {
                error: "rpc down".to_string()
            }),
            Just(GatewayEvent::Expired),
            arb_record().prop_map(|deposit| GatewayEvent::DepositDetected { deposit }),
            (arb_record(), any::<bool>())
                .prop_map(|(deposit, is_final)| GatewayEvent::DepositRestored { deposit, is_final }),
            (arb_hash(), arb_deposit_event()).prop_map(|(source_tx_hash, event)| {
                GatewayEvent::ToDeposit {
                    source_tx_hash,
                    event,
                }
            }),
        ]
        .boxed()
    }
}
