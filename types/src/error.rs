//! Errors shared across crates.

use thiserror::Error;

/// Checked-arithmetic failure. Amounts never wrap; any of these aborts the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// Parsing and validation errors for the primitive types.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid account id: {0}")]
    InvalidAccount(String),
}
