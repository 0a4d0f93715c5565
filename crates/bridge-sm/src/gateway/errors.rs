//! Errors related to the state transitions in the Gateway State Machine.

use crate::{
    errors::SessionSMError,
    gateway::{events::GatewayEvent, state::GatewayState},
};

/// Errors that can occur in the Gateway State Machine.
pub type GSMError = SessionSMError<GatewayState, GatewayEvent>;

/// The result type for operations in the Gateway State Machine.
pub type GSMResult<T> = Result<T, GSMError>;
