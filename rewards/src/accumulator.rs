//! The global reward-per-unit accumulator.

use crate::error::RewardError;
use serde::{Deserialize, Serialize};
use stakevest_types::math::{checked_add, mul_mul_div};
use stakevest_types::{Timestamp, PRECISION};

/// Global accrual state shared by all stakers.
///
/// `reward_per_unit_stored` is the reward one staked unit has earned between
/// genesis and `last_update_time`, scaled by [`PRECISION`]. It only moves
/// forward, and only when [`advance`](Self::advance) is called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccumulator {
    /// Reward units emitted per second across all stakers.
    pub reward_rate: u128,
    /// Accumulator value as of `last_update_time` (scaled by PRECISION).
    pub reward_per_unit_stored: u128,
    /// When `reward_per_unit_stored` was last brought up to date.
    pub last_update_time: Timestamp,
    /// Sum of every staker's balance.
    pub total_staked: u128,
}

impl RewardAccumulator {
    pub fn new(reward_rate: u128, genesis: Timestamp) -> Self {
        Self {
            reward_rate,
            reward_per_unit_stored: 0,
            last_update_time: genesis,
            total_staked: 0,
        }
    }

    /// Accumulator value at `now`, without mutating anything.
    ///
    /// While nothing is staked the value is frozen: reward for empty intervals
    /// is not banked for later stakers. A `now` earlier than the last update
    /// counts as zero elapsed time.
    pub fn reward_per_unit(&self, now: Timestamp) -> Result<u128, RewardError> {
        if self.total_staked == 0 {
            return Ok(self.reward_per_unit_stored);
        }
        let elapsed = self.last_update_time.elapsed_since(now) as u128;
        let growth = mul_mul_div(elapsed, self.reward_rate, PRECISION, self.total_staked)?;
        Ok(checked_add(self.reward_per_unit_stored, growth)?)
    }

    /// Bring the stored value up to `now` and return it.
    ///
    /// `last_update_time` never moves backwards.
    pub fn advance(&mut self, now: Timestamp) -> Result<u128, RewardError> {
        let value = self.reward_per_unit(now)?;
        self.reward_per_unit_stored = value;
        self.last_update_time = self.last_update_time.max(now);
        Ok(value)
    }
}

impl Default for RewardAccumulator {
    fn default() -> Self {
        Self::new(0, Timestamp::EPOCH)
    }
}
