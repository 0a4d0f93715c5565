//! Generic state machine infrastructure shared by every session machine.
//!
//! This module provides the output type and the trait that the gateway, deposit and burn
//! machines implement.

use crate::signals::Signal;

/// Generic output from any state machine after processing an event.
///
/// - `duties`: side effects that need to be executed externally through capabilities
/// - `signals`: messages to be delivered to another state machine
///
/// The type parameters ensure that each state machine can only emit duties and signals that are
/// appropriate for that state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SMOutput<D, S: Into<Signal>> {
    /// The duties that need to be performed by external executors.
    pub duties: Vec<D>,
    /// The signals that need to be sent to other state machines.
    pub signals: Vec<S>,
}

impl<D, S> Default for SMOutput<D, S>
where
    S: Into<Signal>,
{
    fn default() -> Self {
        Self {
            duties: Vec::new(),
            signals: Vec::new(),
        }
    }
}

impl<D, S> SMOutput<D, S>
where
    S: Into<Signal>,
{
    /// Creates a new empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output with only duties.
    pub const fn with_duties(duties: Vec<D>) -> Self {
        Self {
            duties,
            signals: Vec::new(),
        }
    }

    /// Creates an output with only signals.
    pub const fn with_signals(signals: Vec<S>) -> Self {
        Self {
            duties: Vec::new(),
            signals,
        }
    }

    /// Creates an output with both duties and signals.
    pub const fn with_duties_and_signals(duties: Vec<D>, signals: Vec<S>) -> Self {
        Self { duties, signals }
    }

    /// Whether this output carries neither duties nor signals.
    pub fn is_empty(&self) -> bool {
        self.duties.is_empty() && self.signals.is_empty()
    }
}

/// Trait for all session state machines.
///
/// Processing an event is a synchronous transition that never performs I/O. An event that is
/// accepted either changes the machine (its state or its record) or emits at least one duty or
/// signal. Anything else is reported as an error and leaves the machine untouched.
///
/// # Type Safety
///
/// The `OutgoingSignal` associated type is constrained to be convertible to [`Signal`] so that
/// all signals can be unified when routing between state machines, while each machine can only
/// emit the signals it owns.
pub trait StateMachine {
    /// Static configuration handed to every transition.
    type Config;

    /// The type of duties this state machine can emit.
    type Duty;

    /// The type of signals this state machine can emit.
    ///
    /// Must be convertible to the unified [`Signal`] type for routing.
    type OutgoingSignal: Into<Signal>;

    /// The type of events this state machine can process.
    type Event;

    /// The error type returned when event processing fails.
    type Error;

    /// Processes an event and returns the output (duties and signals) or an error.
    fn process_event(
        &mut self,
        cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty, Self::OutgoingSignal>, Self::Error>;
}
