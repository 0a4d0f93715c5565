//! In-memory capabilities with call counters.
//!
//! Every mock is configured up front through builder methods and is then shared behind an
//! [`Arc`](std::sync::Arc). The counters let tests assert how often a side effect was requested,
//! which is how idempotency of submissions is checked.

mod dest;
mod protocol;
mod source;

pub use dest::MockDestChain;
pub use protocol::{MockBurnAndRelease, MockProtocol};
pub use source::MockSourceChain;
