//! Shared utilities.
//!
//! Atomic file writes used by the generators, plus test fixtures.

pub mod fs;

#[cfg(test)]
pub mod testutil;
