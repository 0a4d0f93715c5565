//! This crate contains the various executors that perform duties emitted by the session state
//! machines.
//!
//! The functions and modules defined here are designed to perform actions. An action is any
//! effectful operation that needs to be executed as part of a transfer session. This includes
//! tasks such as allocating deposit addresses, watching chains, requesting signatures from the
//! protocol and submitting transactions.
//!
//! Each executor function has the following properties:
//! - It is an effectful function that only talks to the world through capabilities.
//! - It never touches a state machine. Its outcome is reported back as an event through an
//!   [`outbox::Outbox`], to be processed by the session that owns the duty.
//! - It can be run asynchronously and independently of other executors.

pub mod burn;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod outbox;
pub mod output_handles;
