//! Generic testing utilities for state machines.
//!
//! This module provides reusable testing infrastructure for all state machines
//! implementing the `StateMachine` trait.
//!
//! ## Organization
//!
//! - [`transition`] - Value-based transition testing helpers
//! - [`proptest`] - Property-based testing macros
//!
//! ## Value-Based Testing
//!
//! Implement [`TestMachine`] for a machine, then use the helpers in [`transition`] to test it with
//! specific, concrete values:
//!
//! ```rust,ignore
//! use crate::testing::{test_transition, Transition};
//!
//! test_transition::<MySM>(
//!     (),
//!     Transition {
//!         from_state: MyState::Initial,
//!         event: MyEvent::Start,
//!         expected_state: MyState::Running,
//!         expected_duties: vec![],
//!         expected_signals: vec![],
//!     },
//! );
//! ```
//!
//! ## Property-Based Testing
//!
//! Use the macros in [`proptest`] to test invariant properties over arbitrary machines and events.

pub(crate) mod proptest;
pub(crate) mod transition;

pub(crate) use transition::{
    test_invalid_transition, test_transition, EventSequence, InvalidTransition, TestMachine,
    Transition,
};
