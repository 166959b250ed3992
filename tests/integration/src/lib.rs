//! Integration test utilities for the stock ledger
//!
//! Spawns the full HTTP stack on an ephemeral port, backed by the
//! in-memory store, and drives it with `reqwest`.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
