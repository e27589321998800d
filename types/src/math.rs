//! Fixed-point helpers.
//!
//! Amounts are `u128` raw units. Intermediate products that can exceed 128 bits
//! (`rate × elapsed × PRECISION`, `balance × Δaccumulator`) are formed in 256 bits
//! and narrowed back, failing rather than truncating.

use crate::error::MathError;
use primitive_types::U256;

/// Scale factor applied to the reward-per-unit accumulator (1e18).
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// `a * b / denominator`, rounded down.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(MathError::Overflow)?;
    narrow(product / U256::from(denominator))
}

/// `a * b * c / denominator`, rounded down, with a single final division.
pub fn mul_mul_div(a: u128, b: u128, c: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .and_then(|p| p.checked_mul(U256::from(c)))
        .ok_or(MathError::Overflow)?;
    narrow(product / U256::from(denominator))
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

fn narrow(value: U256) -> Result<u128, MathError> {
    if value.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(value.low_u128())
}
