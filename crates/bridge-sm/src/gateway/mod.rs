//! The state machine for managing the lifecycle of a lock-and-mint session.
//!
//! This state machine handles the following:
//!
//! - Allocating the deposit address, or resuming a session that already has one.
//! - Watching the source chain for deposits until the session expires.
//! - Spawning and driving one [`DepositSM`](crate::deposit::machine::DepositSM) per deposit.
//! - Tracking which deposits can be claimed.

pub mod context;
pub mod duties;
pub mod errors;
pub mod events;
pub mod machine;
pub mod state;
#[cfg(test)]
mod tests;
pub mod transitions;
