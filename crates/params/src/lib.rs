//! This crate contains the runtime parameters that tune how transfer sessions are driven, such as
//! timers and fallbacks used when a chain cannot report a value.

mod default;
pub mod session;

pub use session::SessionParams;
