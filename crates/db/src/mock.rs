//! Test doubles for the repository traits.
//!
//! `repositories` holds mockall mocks for expectation-style tests; `memory`
//! holds working in-memory stores for tests that need real state.

pub mod memory;
pub mod repositories;
