//! Errors related to the state transitions in the Deposit State Machine.

use crate::{
    deposit::{events::DepositEvent, state::DepositState},
    errors::SessionSMError,
};

/// Errors that can occur in the Deposit State Machine.
pub type DSMError = SessionSMError<DepositState, DepositEvent>;

/// The result type for operations in the Deposit State Machine.
pub type DSMResult<T> = Result<T, DSMError>;
