//! # City Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Sample game states
//! - Scratch save directories driven by a fixed clock
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
