//! Static configuration common to all duty executors.

use std::time::Duration;

use ren_gateway_params::SessionParams;

/// The static configuration for the duty executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// The confirmation target assumed when a chain cannot report one.
    pub default_confirmation_target: u64,

    /// The delay before a scheduled burn submission fires.
    pub auto_submit_delay: Duration,
}

impl From<&SessionParams> for ExecutionConfig {
    fn from(params: &SessionParams) -> Self {
        Self {
            default_confirmation_target: params.default_confirmation_target,
            auto_submit_delay: params.auto_submit_delay(),
        }
    }
}
