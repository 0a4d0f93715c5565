//! This crate implements the state machines that drive transfer sessions.
//!
//! A lock-and-mint session is driven by a [`gateway::machine::GatewaySM`] that owns one
//! [`deposit::machine::DepositSM`] child per detected deposit. A burn-and-release session is
//! driven by a single [`burn::machine::BurnSM`]. The machines are pure: they react to events by
//! updating their serializable records and emitting duties that must be executed externally,
//! and children push their parent around by emitting signals.

pub mod burn;
pub mod deposit;
pub mod errors;
pub mod gateway;
pub mod signals;
pub mod state_machine;

#[cfg(test)]
pub(crate) mod testing;
