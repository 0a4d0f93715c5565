//! The state machine for managing the lifecycle of a burn-and-release session.
//!
//! A burn session tracks exactly one burn on the host chain: it submits the burn, waits for it
//! to settle, asks the protocol to release the native asset and records the release.

pub mod config;
pub mod duties;
pub mod errors;
pub mod events;
pub mod machine;
pub mod state;
#[cfg(test)]
mod tests;
pub mod transitions;
