//! Fundamental types for stakevest.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, timestamps and clocks, and the checked fixed-point
//! arithmetic used by both the reward accumulator and the vesting ledger.

pub mod address;
pub mod amount;
pub mod error;
pub mod math;
pub mod time;

pub use address::AccountId;
pub use error::{MathError, TypesError};
pub use math::PRECISION;
pub use time::{Clock, Timestamp};
