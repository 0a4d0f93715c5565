//! Value-based transition testing helpers.
//!
//! Transition tables are written against [`TestMachine`], which knows how to put a machine in a
//! named state with a record that fits it. Longer scenarios run through [`EventSequence`], which
//! keeps every output and error for later assertions.

use std::fmt::Debug;

use crate::state_machine::{SMOutput, StateMachine};

/// A state machine that tests can build from, and compare by, its state name.
pub(crate) trait TestMachine: StateMachine + Sized {
    /// The state name of the machine.
    type State: Clone + PartialEq + Debug;

    /// Builds a machine in `state` holding a record consistent with that state.
    fn in_state(state: Self::State) -> Self;

    /// The current state name.
    fn current(&self) -> &Self::State;
}

/// A transition that must be accepted.
#[derive(Debug)]
pub(crate) struct Transition<SM: TestMachine> {
    /// The initial state before the transition
    pub(crate) from_state: SM::State,
    /// The event that triggers the transition
    pub(crate) event: SM::Event,
    /// The expected state after the transition
    pub(crate) expected_state: SM::State,
    /// The expected duties emitted during the transition
    pub(crate) expected_duties: Vec<SM::Duty>,
    /// The expected signals emitted during the transition
    pub(crate) expected_signals: Vec<SM::OutgoingSignal>,
}

/// Asserts that `transition` is accepted with exactly the expected state, duties and signals.
pub(crate) fn test_transition<SM>(config: SM::Config, transition: Transition<SM>)
where
    SM: TestMachine,
    SM::Duty: PartialEq + Debug,
    SM::OutgoingSignal: PartialEq + Debug,
    SM::Error: Debug,
{
    let Transition {
        from_state,
        event,
        expected_state,
        expected_duties,
        expected_signals,
    } = transition;

    let mut sm = SM::in_state(from_state);
    let output = match sm.process_event(config, event) {
        Ok(output) => output,
        Err(err) => panic!("Expected successful transition, got error: {err:?}"),
    };

    assert_eq!(sm.current(), &expected_state, "State mismatch after transition");
    assert_eq!(output.duties, expected_duties, "Duties mismatch");
    assert_eq!(output.signals, expected_signals, "Signals mismatch");
}

/// A state-event pair that must fail.
#[derive(Debug)]
pub(crate) struct InvalidTransition<SM: TestMachine> {
    /// The initial state
    pub(crate) from_state: SM::State,
    /// The event that should fail
    pub(crate) event: SM::Event,
    /// Checks that the error is of the expected kind
    pub(crate) expected_error: fn(&SM::Error) -> bool,
}

/// Asserts that `invalid` fails with the expected kind of error and leaves the state unchanged.
pub(crate) fn test_invalid_transition<SM>(config: SM::Config, invalid: InvalidTransition<SM>)
where
    SM: TestMachine,
    SM::Duty: Debug,
    SM::OutgoingSignal: Debug,
    SM::Error: Debug,
{
    let InvalidTransition {
        from_state,
        event,
        expected_error,
    } = invalid;

    let mut sm = SM::in_state(from_state);
    let before = sm.current().clone();

    let err = match sm.process_event(config, event) {
        Ok(output) => panic!("Expected error, but transition succeeded with {output:?}"),
        Err(err) => err,
    };

    assert!(expected_error(&err), "Error kind mismatch. Got: {err:?}");
    assert_eq!(sm.current(), &before, "State changed despite error");
}

/// Runs a scenario of events through one machine and records what happened.
///
/// Failed events do not stop the scenario; their errors are kept in order.
#[derive(Debug)]
pub(crate) struct EventSequence<SM: StateMachine> {
    sm: SM,
    outputs: Vec<SMOutput<SM::Duty, SM::OutgoingSignal>>,
    errors: Vec<SM::Error>,
}

impl<SM: TestMachine> EventSequence<SM> {
    /// Starts a scenario at `sm`.
    pub(crate) const fn new(sm: SM) -> Self {
        Self {
            sm,
            outputs: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Processes an event and records the result.
    pub(crate) fn process(&mut self, config: SM::Config, event: SM::Event) -> &mut Self {
        match self.sm.process_event(config, event) {
            Ok(output) => self.outputs.push(output),
            Err(err) => self.errors.push(err),
        }
        self
    }

    /// The current state name.
    pub(crate) fn state(&self) -> &SM::State {
        self.sm.current()
    }

    /// The machine under test.
    pub(crate) const fn machine(&self) -> &SM {
        &self.sm
    }

    /// Asserts that every event so far was accepted.
    pub(crate) fn assert_no_errors(&self) -> &Self
    where
        SM::Error: Debug,
    {
        assert!(
            self.errors.is_empty(),
            "Expected no errors, got {:?}",
            self.errors
        );
        self
    }

    /// Asserts the current state name.
    pub(crate) fn assert_final_state(&self, expected: &SM::State) -> &Self {
        assert_eq!(self.state(), expected, "Final state mismatch");
        self
    }

    /// Every duty emitted so far, in order.
    pub(crate) fn all_duties(&self) -> Vec<&SM::Duty> {
        self.outputs.iter().flat_map(|o| &o.duties).collect()
    }

    /// Every signal emitted so far, in order.
    pub(crate) fn all_signals(&self) -> Vec<&SM::OutgoingSignal> {
        self.outputs.iter().flat_map(|o| &o.signals).collect()
    }

    /// Every error returned so far, in order.
    pub(crate) fn all_errors(&self) -> Vec<&SM::Error> {
        self.errors.iter().collect()
    }

    /// Asserts that each of `expected` was emitted at some point.
    pub(crate) fn assert_duties_contain(&self, expected: &[SM::Duty]) -> &Self
    where
        SM::Duty: PartialEq + Debug,
    {
        let all_duties = self.all_duties();
        for duty in expected {
            assert!(
                all_duties.contains(&duty),
                "Expected duty {duty:?} not found. All duties: {all_duties:?}"
            );
        }
        self
    }
}
