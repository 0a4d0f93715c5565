//! The state transition functions of the Deposit State Machine.

mod claim;
mod restore;
mod settle;
