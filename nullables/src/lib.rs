//! Nullable infrastructure for deterministic testing and simulation.
//!
//! External dependencies (the clock, token collaborators) sit behind traits.
//! This crate provides controllable implementations that:
//! - Return deterministic values
//! - Can be steered programmatically (advance time, inject transfer failures)
//! - Never touch the system clock
//!
//! Usage: swap real implementations for nullables in tests and scenario runs.

pub mod clock;
pub mod token;

pub use clock::NullClock;
pub use token::NullToken;
