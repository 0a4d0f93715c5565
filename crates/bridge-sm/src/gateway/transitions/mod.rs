//! The state transition functions of the Gateway State Machine.

mod children;
mod session;
