//! The state machine for managing the lifecycle of a single deposit within a mint session.
//!
//! This state machine handles the following:
//!
//! - Resuming a deposit from its stored record and fresh chain data.
//! - Tracking the deposit's confirmations on the source chain.
//! - Obtaining the protocol's signature for the deposit.
//! - Submitting the mint on the destination chain and retrying failed submissions.
//! - Recording the acknowledgement of the mint result.

pub mod errors;
pub mod events;
pub mod machine;
pub mod state;
#[cfg(test)]
mod tests;
pub mod transitions;
