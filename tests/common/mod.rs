//! Common test utilities for exercise-validator integration tests

#[allow(dead_code)]
pub mod fixtures;

pub use fixtures::*;
