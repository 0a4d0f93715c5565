//! The shallowest layer of abstraction in the gateway that is responsible for:
//!
//! - Building session contexts from a serialized session record and per-chain capability maps.
//! - Driving a state machine per session: multiplexing executor results, user controls, shutdown
//!   requests and timers into the machine one event at a time.
//! - Dispatching the duties emitted by the machines to the executors that perform them.
//! - Exposing handles through which callers control and observe a running session.

pub mod burn;
pub mod config;
pub mod context;
pub mod duty_dispatcher;
pub mod errors;
pub mod events_mux;
pub mod handle;
pub mod mint;
pub mod sdk_cache;

#[cfg(test)]
mod testing;
