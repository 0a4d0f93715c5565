//! This crate provides test-utilities shared by the crates in this workspace.
//!
//! It contains in-memory implementations of the chain and protocol capabilities that count how
//! often they are called, fixtures for session records and a helper to route logs to the test
//! harness.

pub mod fixtures;
pub mod logging;
pub mod mocks;
