//! A single beneficiary's release curve.

use serde::{Deserialize, Serialize};
use stakevest_types::math::{checked_add, checked_sub, mul_div};
use stakevest_types::{MathError, Timestamp};

use crate::error::VestingError;

/// Cliff-then-linear schedule.
///
/// Only `total_withdrawn` changes after creation, and only upward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub start_time: Timestamp,
    pub cliff_time: Timestamp,
    pub end_time: Timestamp,
    /// Released in full at the cliff.
    pub unlock_amount: u128,
    pub total_amount: u128,
    pub total_withdrawn: u128,
}

impl VestingSchedule {
    /// Build a fresh schedule, checking its shape but not its start against
    /// any clock.
    pub fn new(
        start_time: Timestamp,
        cliff_time: Timestamp,
        end_time: Timestamp,
        unlock_amount: u128,
        total_amount: u128,
    ) -> Result<Self, VestingError> {
        if cliff_time < start_time {
            return Err(VestingError::CliffBeforeStart {
                start: start_time,
                cliff: cliff_time,
            });
        }
        if end_time < cliff_time {
            return Err(VestingError::EndBeforeCliff {
                cliff: cliff_time,
                end: end_time,
            });
        }
        if unlock_amount > total_amount {
            return Err(VestingError::UnlockExceedsTotal {
                unlock: unlock_amount,
                total: total_amount,
            });
        }
        Ok(Self {
            start_time,
            cliff_time,
            end_time,
            unlock_amount,
            total_amount,
            total_withdrawn: 0,
        })
    }

    /// Cumulative entitlement at `now`, ignoring what was already withdrawn.
    pub fn vested_amount(&self, now: Timestamp) -> Result<u128, MathError> {
        if now < self.cliff_time {
            return Ok(0);
        }
        if now >= self.end_time {
            return Ok(self.total_amount);
        }
        // cliff <= now < end, so the span is non-zero here.
        let linear_pool = checked_sub(self.total_amount, self.unlock_amount)?;
        let elapsed = self.cliff_time.elapsed_since(now) as u128;
        let span = self.cliff_time.elapsed_since(self.end_time) as u128;
        let linear = mul_div(linear_pool, elapsed, span)?;
        Ok(checked_add(self.unlock_amount, linear)?.min(self.total_amount))
    }

    /// What the beneficiary could withdraw at `now`.
    pub fn withdrawable_amount(&self, now: Timestamp) -> Result<u128, MathError> {
        if now >= self.end_time {
            return checked_sub(self.total_amount, self.total_withdrawn);
        }
        checked_sub(self.vested_amount(now)?, self.total_withdrawn)
    }

    /// Tokens not yet withdrawn.
    pub fn remaining(&self) -> u128 {
        self.total_amount.saturating_sub(self.total_withdrawn)
    }

    pub fn is_fully_withdrawn(&self) -> bool {
        self.total_withdrawn >= self.total_amount
    }
}
