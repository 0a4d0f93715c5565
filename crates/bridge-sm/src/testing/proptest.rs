//! Property-based testing macros for state machines.
//!
//! Every macro takes the machine type, the configuration handed to `process_event`, a strategy
//! that generates whole machines (state and record together) and a strategy for events. Each
//! expands to a single `proptest!` test, so a test module can only use each macro once.

/// Property: processing is a pure function of the machine and the event.
///
/// Two copies of the same machine fed the same event end up equal and produce the same output,
/// or both fail with the same error.
#[macro_export]
macro_rules! prop_deterministic {
    ($sm_type:ty, $config:expr, $machines:expr, $events:expr) => {
        proptest::proptest! {
            #[test]
            fn processing_is_deterministic(sm in $machines, event in $events) {
                use $crate::state_machine::StateMachine;

                let mut left: $sm_type = sm.clone();
                let mut right: $sm_type = sm;

                match (
                    left.process_event($config, event.clone()),
                    right.process_event($config, event),
                ) {
                    (Ok(left_out), Ok(right_out)) => {
                        proptest::prop_assert_eq!(&left, &right);
                        proptest::prop_assert_eq!(left_out, right_out);
                    }
                    (Err(left_err), Err(right_err)) => {
                        proptest::prop_assert_eq!(left_err.to_string(), right_err.to_string());
                    }
                    (left_res, right_res) => {
                        proptest::prop_assert!(
                            false,
                            "same input diverged: {:?} vs {:?}",
                            left_res,
                            right_res
                        );
                    }
                }
            }
        }
    };
}

/// Property: a machine in a terminal state rejects every event and stays as it is.
#[macro_export]
macro_rules! prop_terminal_states_reject {
    ($sm_type:ty, $config:expr, $terminal_machines:expr, $events:expr) => {
        proptest::proptest! {
            #[test]
            fn terminal_machines_reject_all_events(sm in $terminal_machines, event in $events) {
                use $crate::state_machine::StateMachine;

                let before: $sm_type = sm.clone();
                let mut after: $sm_type = sm;
                let result = after.process_event($config, event);

                proptest::prop_assert!(result.is_err(), "terminal machine accepted: {:?}", result);
                proptest::prop_assert_eq!(before, after);
            }
        }
    };
}

/// Property: an accepted event changes the machine or emits output, and an error leaves the
/// machine untouched.
#[macro_export]
macro_rules! prop_no_silent_acceptance {
    ($sm_type:ty, $config:expr, $machines:expr, $events:expr) => {
        proptest::proptest! {
            #[test]
            fn events_change_machine_or_fail(sm in $machines, event in $events) {
                use $crate::state_machine::StateMachine;

                let before: $sm_type = sm.clone();
                let mut after: $sm_type = sm;

                match after.process_event($config, event) {
                    Ok(output) => proptest::prop_assert!(
                        before != after || !output.is_empty(),
                        "event accepted without effect in {:?}",
                        before
                    ),
                    Err(err) => proptest::prop_assert_eq!(
                        &before,
                        &after,
                        "machine changed despite error: {}",
                        err
                    ),
                }
            }
        }
    };
}
