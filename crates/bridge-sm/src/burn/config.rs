//! Configuration shared across all burn state machines.

/// Static configuration of a burn session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BurnSMCfg {
    /// Submit the burn as soon as the listener is ready instead of waiting for the user.
    pub auto_submit: bool,
}

impl BurnSMCfg {
    /// Returns whether the burn is submitted without waiting for the user.
    pub const fn auto_submit(&self) -> bool {
        self.auto_submit
    }
}
