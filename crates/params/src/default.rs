//! Default values for session parameters.

/// Delay before a burn session submits on its own once its listener is ready.
pub(crate) const AUTO_SUBMIT_DELAY_MS: u64 = 500;

/// How long a session waits for in-flight work after shutdown was requested.
pub(crate) const SHUTDOWN_TIMEOUT_MS: u64 = 5_000;

/// Confirmation target assumed when the source chain cannot report one.
pub(crate) const CONFIRMATION_TARGET: u64 = 6;
