//! Reusable utilities for processes that host transfer sessions, such as initializing the tracing
//! framework.

pub mod logging;

// Re-export tracing crate for convenience.
pub use tracing;
