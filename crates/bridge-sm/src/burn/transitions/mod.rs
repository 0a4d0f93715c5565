//! The state transition functions of the Burn State Machine.

mod burn;
mod release;
