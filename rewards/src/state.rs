//! Per-staker checkpoint state.

use crate::error::RewardError;
use serde::{Deserialize, Serialize};
use stakevest_types::math::{checked_add, checked_sub, mul_div};
use stakevest_types::PRECISION;

/// What the pool remembers about one staker.
///
/// Only the staker's own calls change this record, and every such call
/// checkpoints it first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerState {
    /// Units currently staked.
    pub balance: u128,
    /// Accumulator value at the last checkpoint (scaled by PRECISION).
    pub reward_per_unit_paid: u128,
    /// Rewards credited at checkpoints but not yet paid out.
    pub rewards_owed: u128,
}

impl StakerState {
    /// Entitlement given the accumulator value `reward_per_unit`.
    ///
    /// `balance × (reward_per_unit − reward_per_unit_paid) / PRECISION + rewards_owed`
    pub fn earned(&self, reward_per_unit: u128) -> Result<u128, RewardError> {
        let growth = checked_sub(reward_per_unit, self.reward_per_unit_paid)?;
        let fresh = mul_div(self.balance, growth, PRECISION)?;
        Ok(checked_add(fresh, self.rewards_owed)?)
    }

    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.rewards_owed == 0
    }
}
