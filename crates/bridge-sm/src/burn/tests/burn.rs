//! Unit Tests for the submission and settling phases of a burn

use std::sync::Arc;

use ren_gateway_primitives::burn::{BurnSession, BurnStage, SubmittedBurn};

use crate::{
    burn::{
        config::BurnSMCfg,
        duties::BurnDuty,
        errors::BSMError,
        events::BurnEvent,
        machine::BurnSM,
        state::BurnState,
        tests::{
            burn_session, create_sm, record_for, submitted_burn, test_burn_invalid_transition,
            test_burn_transition, test_cfg, BurnInvalidTransition, BurnTransition, TEST_BURN_HASH,
            TEST_TARGET,
        },
    },
    state_machine::StateMachine,
    testing::EventSequence,
};

fn restoring_with(state_of_record: BurnState) -> BurnSM {
    BurnSM::new(BurnSession {
        transaction: record_for(state_of_record),
        ..burn_session()
    })
}

#[test]
fn test_restore_fresh_session_creates_listener() {
    let mut sm = restoring_with(BurnState::Creating);

    let output = sm
        .process_event(test_cfg(), BurnEvent::Restore)
        .expect("restore must succeed");

    assert_eq!(sm.state(), &BurnState::Creating);
    assert_eq!(
        output.duties,
        vec![BurnDuty::SpawnListener {
            session: burn_session()
        }]
    );
}

#[test]
fn test_restore_submitted_burn_resumes_settling() {
    let mut sm = restoring_with(BurnState::SrcSettling);
    let session = sm.tx().clone();

    let output = sm
        .process_event(test_cfg(), BurnEvent::Restore)
        .expect("restore must succeed");

    assert_eq!(sm.state(), &BurnState::SrcSettling);
    assert_eq!(output.duties, vec![BurnDuty::SpawnListener { session }]);
}

#[test]
fn test_restore_answered_release_is_done() {
    let mut sm = restoring_with(BurnState::DestInitiated);

    let output = sm
        .process_event(test_cfg(), BurnEvent::Restore)
        .expect("restore must succeed");

    assert_eq!(sm.state(), &BurnState::DestInitiated);
    assert!(output.is_empty(), "no listener for a finished burn");
}

#[test]
fn test_restore_null_response_is_not_done() {
    let record = record_for(BurnState::Accepted)
        .and_then(|record| record.release(None, serde_json::Value::Null, None).ok());
    let mut sm = BurnSM::new(BurnSession {
        transaction: record,
        ..burn_session()
    });

    sm.process_event(test_cfg(), BurnEvent::Restore)
        .expect("restore must succeed");

    assert_eq!(sm.state(), &BurnState::SrcSettling);
}

#[test]
fn test_second_restore_is_duplicate() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::Creating,
        event: BurnEvent::Restore,
        expected_error: |e| matches!(e, BSMError::Duplicate { .. }),
    });
}

#[test]
fn test_created_waits_for_user() {
    test_burn_transition(BurnTransition {
        from_state: BurnState::Creating,
        event: BurnEvent::Created,
        expected_state: BurnState::Created,
        expected_duties: vec![],
        expected_signals: vec![],
    });
}

#[test]
fn test_created_with_auto_submit_schedules_submit() {
    let mut sm = create_sm(BurnState::Creating);

    let output = sm
        .process_event(Arc::new(BurnSMCfg { auto_submit: true }), BurnEvent::Created)
        .expect("created must succeed");

    assert_eq!(sm.state(), &BurnState::Created);
    assert_eq!(output.duties, vec![BurnDuty::ScheduleSubmit]);
}

#[test]
fn test_created_while_settling_resumes_submission() {
    test_burn_transition(BurnTransition {
        from_state: BurnState::SrcSettling,
        event: BurnEvent::Created,
        expected_state: BurnState::SrcSettling,
        expected_duties: vec![BurnDuty::ScheduleSubmit],
        expected_signals: vec![],
    });
}

#[test]
fn test_submit_before_listener_is_rejected() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::Creating,
        event: BurnEvent::Submit,
        expected_error: |e| matches!(e, BSMError::Rejected { .. }) && !e.is_fatal(),
    });
}

#[test]
fn test_submit_is_idempotent() {
    let mut seq = EventSequence::new(create_sm(BurnState::Created));

    seq.process(test_cfg(), BurnEvent::Submit)
        .process(test_cfg(), BurnEvent::Submit);

    seq.assert_final_state(&BurnState::SubmittingBurn);
    assert_eq!(seq.all_duties(), vec![&BurnDuty::SubmitBurn]);

    let errors = seq.all_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], BSMError::Duplicate { .. }));
}

#[test]
fn test_submitted_records_the_burn() {
    let mut sm = create_sm(BurnState::SubmittingBurn);

    let output = sm
        .process_event(
            test_cfg(),
            BurnEvent::Submitted {
                burn: submitted_burn(),
            },
        )
        .expect("submitted must succeed");

    assert!(output.is_empty());
    assert_eq!(sm.state(), &BurnState::SubmittingBurn);
    assert_eq!(sm.tx().source_tx_hash(), Some(&TEST_BURN_HASH.to_string()));
}

#[test]
fn test_submitted_with_different_hash_while_settling_is_rejected() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::SrcSettling,
        event: BurnEvent::Submitted {
            burn: SubmittedBurn {
                source_tx_hash: "h2".to_string(),
                ..submitted_burn()
            },
        },
        expected_error: |e| matches!(e, BSMError::Rejected { .. }),
    });
}

#[test]
fn test_first_confirmation_starts_settling() {
    let mut seq = EventSequence::new(create_sm(BurnState::SubmittingBurn));

    seq.process(
        test_cfg(),
        BurnEvent::Submitted {
            burn: submitted_burn(),
        },
    )
    .process(
        test_cfg(),
        BurnEvent::Confirmation {
            confs: 1,
            target: TEST_TARGET,
        },
    );

    seq.assert_no_errors()
        .assert_final_state(&BurnState::SrcSettling);
    let record = seq.machine().tx().transaction.as_ref().expect("burn recorded");
    assert_eq!(record.confirmations(), (1, TEST_TARGET));
}

#[test]
fn test_confirmation_without_burn_hash_is_invalid() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::SubmittingBurn,
        event: BurnEvent::Confirmation {
            confs: 1,
            target: TEST_TARGET,
        },
        expected_error: |e| matches!(e, BSMError::InvalidEvent { .. }) && e.is_fatal(),
    });
}

#[test]
fn test_confirmations_never_decrease() {
    let mut seq = EventSequence::new(create_sm(BurnState::SrcSettling));

    for confs in [0, 1, 3, 2] {
        seq.process(
            test_cfg(),
            BurnEvent::Confirmation {
                confs,
                target: TEST_TARGET,
            },
        );
    }

    seq.assert_final_state(&BurnState::SrcSettling);
    let record = seq.machine().tx().transaction.as_ref().expect("burn recorded");
    assert_eq!(record.confirmations(), (3, TEST_TARGET));
    assert_eq!(seq.all_errors().len(), 3, "only the report of 3 raises the count");
}

#[test]
fn test_confirmed_requests_release() {
    let mut sm = create_sm(BurnState::SrcSettling);

    let output = sm
        .process_event(
            test_cfg(),
            BurnEvent::Confirmed {
                confs: TEST_TARGET,
                target: TEST_TARGET,
            },
        )
        .expect("confirmed must succeed");

    assert_eq!(sm.state(), &BurnState::SrcConfirmed);
    assert_eq!(output.duties, vec![BurnDuty::Release]);

    let record = sm.tx().transaction.as_ref().expect("burn recorded");
    assert_eq!(record.stage(), BurnStage::Submitted);
    assert_eq!(record.confirmations(), (TEST_TARGET, TEST_TARGET));
}

#[test]
fn test_second_confirmed_is_rejected_without_side_effects() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::SrcConfirmed,
        event: BurnEvent::Confirmed {
            confs: TEST_TARGET,
            target: TEST_TARGET,
        },
        expected_error: |e| matches!(e, BSMError::Rejected { .. }) && !e.is_fatal(),
    });
}

#[test]
fn test_burn_error_is_final() {
    let mut seq = EventSequence::new(create_sm(BurnState::SubmittingBurn));

    seq.process(
        test_cfg(),
        BurnEvent::BurnError {
            error: "insufficient balance".to_string(),
        },
    )
    .process(test_cfg(), BurnEvent::Submit);

    seq.assert_final_state(&BurnState::ErrorBurning);
    assert_eq!(
        seq.machine().tx().error.as_deref(),
        Some("insufficient balance")
    );
    assert_eq!(seq.all_errors().len(), 1);
    assert!(seq.all_duties().is_empty());
}

#[test]
fn test_burn_error_after_confirmation_is_rejected() {
    test_burn_invalid_transition(BurnInvalidTransition {
        from_state: BurnState::SrcConfirmed,
        event: BurnEvent::BurnError {
            error: "late".to_string(),
        },
        expected_error: |e| matches!(e, BSMError::Rejected { .. }),
    });
}
