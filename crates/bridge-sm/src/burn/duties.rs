//! The duties that need to be performed in the Burn State Machine in response to the state
//! transitions.

use ren_gateway_primitives::burn::BurnSession;

/// The duties that need to be performed to drive the Burn State Machine forward.
#[derive(Debug, Clone, PartialEq)]
pub enum BurnDuty {
    /// Start the burn-and-release listener for the session, resuming its burn if one is known.
    SpawnListener {
        /// The session to listen for.
        session: BurnSession,
    },
    /// Deliver [`BurnEvent::Submit`](crate::burn::events::BurnEvent::Submit) after the
    /// configured delay.
    ScheduleSubmit,
    /// Have the listener submit the burn.
    SubmitBurn,
    /// Have the listener request the release.
    Release,
}

impl std::fmt::Display for BurnDuty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BurnDuty::SpawnListener { session } => {
                write!(f, "SpawnListener (session: {})", session.id)
            }
            BurnDuty::ScheduleSubmit => write!(f, "ScheduleSubmit"),
            BurnDuty::SubmitBurn => write!(f, "SubmitBurn"),
            BurnDuty::Release => write!(f, "Release"),
        }
    }
}
