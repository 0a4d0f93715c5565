//! Parameters shared by every session driver.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::default::{AUTO_SUBMIT_DELAY_MS, CONFIRMATION_TARGET, SHUTDOWN_TIMEOUT_MS};

/// Timers and fallbacks used while driving mint and burn sessions.
///
/// Every field is optional in serialized form and falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Delay in milliseconds before a burn is submitted automatically.
    pub auto_submit_delay_ms: u64,

    /// Time in milliseconds to wait for in-flight work during shutdown before aborting it.
    pub shutdown_timeout_ms: u64,

    /// Confirmation target used when the source chain cannot report one.
    pub default_confirmation_target: u64,
}

impl SessionParams {
    /// The auto-submit delay as a [`Duration`].
    pub const fn auto_submit_delay(&self) -> Duration {
        Duration::from_millis(self.auto_submit_delay_ms)
    }

    /// The shutdown timeout as a [`Duration`].
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            auto_submit_delay_ms: AUTO_SUBMIT_DELAY_MS,
            shutdown_timeout_ms: SHUTDOWN_TIMEOUT_MS,
            default_confirmation_target: CONFIRMATION_TARGET,
        }
    }
}
