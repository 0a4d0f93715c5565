//! Errors related to the state transitions in the Burn State Machine.

use crate::{
    burn::{events::BurnEvent, state::BurnState},
    errors::SessionSMError,
};

/// Errors that can occur in the Burn State Machine.
pub type BSMError = SessionSMError<BurnState, BurnEvent>;

/// The result type for operations in the Burn State Machine.
pub type BSMResult<T> = Result<T, BSMError>;
