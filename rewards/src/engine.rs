//! Core reward bookkeeping: accumulator plus per-staker checkpoints.

use std::collections::HashMap;

use crate::accumulator::RewardAccumulator;
use crate::error::RewardError;
use crate::state::StakerState;
use serde::{Deserialize, Serialize};
use stakevest_types::math::{checked_add, checked_sub};
use stakevest_types::{AccountId, Timestamp};
use tracing::debug;

/// Pre-call copy of everything a single-account operation can touch.
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    account: AccountId,
    accumulator: RewardAccumulator,
    staker: Option<StakerState>,
}

/// The reward engine: accumulator, balances and checkpoints.
///
/// Callers are assumed to be authorized already; the engine moves no tokens.
/// Every mutating method checkpoints the account before changing it, and
/// validates before mutating so a returned error leaves the engine untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RewardEngine {
    pub accumulator: RewardAccumulator,
    stakers: HashMap<AccountId, StakerState>,
}

impl RewardEngine {
    pub fn new(reward_rate: u128, genesis: Timestamp) -> Self {
        Self {
            accumulator: RewardAccumulator::new(reward_rate, genesis),
            stakers: HashMap::new(),
        }
    }

    pub fn reward_per_unit(&self, now: Timestamp) -> Result<u128, RewardError> {
        self.accumulator.reward_per_unit(now)
    }

    /// Everything `account` could claim at `now`.
    pub fn earned(&self, account: &AccountId, now: Timestamp) -> Result<u128, RewardError> {
        let current = self.reward_per_unit(now)?;
        match self.stakers.get(account) {
            Some(staker) => staker.earned(current),
            None => Ok(0),
        }
    }

    pub fn total_staked(&self) -> u128 {
        self.accumulator.total_staked
    }

    pub fn reward_rate(&self) -> u128 {
        self.accumulator.reward_rate
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.stakers.get(account).map(|s| s.balance).unwrap_or(0)
    }

    pub fn staker(&self, account: &AccountId) -> Option<&StakerState> {
        self.stakers.get(account)
    }

    pub fn stakers(&self) -> impl Iterator<Item = (&AccountId, &StakerState)> {
        self.stakers.iter()
    }

    /// Bring the accumulator up to `now` and settle `account` against it.
    ///
    /// Order matters: the accumulator must reach `now` before the owed amount
    /// is computed, and the new accumulator value becomes the account's
    /// baseline. Doing either out of order shorts or double-pays the account
    /// at its next checkpoint.
    pub fn checkpoint(&mut self, account: &AccountId, now: Timestamp) -> Result<(), RewardError> {
        let current = self.accumulator.reward_per_unit(now)?;
        let mut staker = self.stakers.get(account).cloned().unwrap_or_default();
        let owed = staker.earned(current)?;

        self.accumulator.reward_per_unit_stored = current;
        self.accumulator.last_update_time = self.accumulator.last_update_time.max(now);
        staker.rewards_owed = owed;
        staker.reward_per_unit_paid = current;
        debug!(%account, reward_per_unit = current, owed, "checkpoint");
        self.store(account, staker);
        Ok(())
    }

    /// Add `amount` to the account's stake. Returns the new balance.
    pub fn stake(
        &mut self,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        if amount == 0 {
            return Err(RewardError::ZeroAmount);
        }
        let total = checked_add(self.accumulator.total_staked, amount)?;
        let balance = checked_add(self.balance_of(account), amount)?;
        self.checkpoint(account, now)?;
        self.accumulator.total_staked = total;
        self.staker_mut(account).balance = balance;
        Ok(balance)
    }

    /// Remove `amount` from the account's stake. Returns the new balance.
    ///
    /// Withdrawing more than is staked fails; balances never wrap.
    pub fn withdraw(
        &mut self,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        let staked = self.balance_of(account);
        if amount > staked {
            return Err(RewardError::InsufficientStake {
                requested: amount,
                staked,
            });
        }
        let total = checked_sub(self.accumulator.total_staked, amount)?;
        self.checkpoint(account, now)?;
        self.accumulator.total_staked = total;
        let mut staker = self.stakers.get(account).cloned().unwrap_or_default();
        staker.balance = staked - amount;
        self.store(account, staker);
        Ok(staked - amount)
    }

    /// Checkpoint the account, then zero and return what it is owed.
    pub fn take_reward(
        &mut self,
        account: &AccountId,
        now: Timestamp,
    ) -> Result<u128, RewardError> {
        self.checkpoint(account, now)?;
        let mut staker = self.stakers.get(account).cloned().unwrap_or_default();
        let owed = std::mem::take(&mut staker.rewards_owed);
        self.store(account, staker);
        Ok(owed)
    }

    /// Advance the accumulator to `now` without settling any account.
    pub fn sync(&mut self, now: Timestamp) -> Result<u128, RewardError> {
        self.accumulator.advance(now)
    }

    /// Replace the reward rate. Returns the previous rate.
    ///
    /// No checkpoint is taken: time elapsed since the last update and not yet
    /// folded into the accumulator accrues at the new rate.
    pub fn set_reward_rate(&mut self, rate: u128) -> u128 {
        std::mem::replace(&mut self.accumulator.reward_rate, rate)
    }

    pub fn snapshot(&self, account: &AccountId) -> EngineSnapshot {
        EngineSnapshot {
            account: *account,
            accumulator: self.accumulator.clone(),
            staker: self.stakers.get(account).cloned(),
        }
    }

    /// Roll back to a snapshot taken before a single-account operation.
    pub fn restore(&mut self, snapshot: EngineSnapshot) {
        self.accumulator = snapshot.accumulator;
        match snapshot.staker {
            Some(staker) => {
                self.stakers.insert(snapshot.account, staker);
            }
            None => {
                self.stakers.remove(&snapshot.account);
            }
        }
    }

    fn staker_mut(&mut self, account: &AccountId) -> &mut StakerState {
        self.stakers.entry(*account).or_default()
    }

    /// Write back a staker record. An empty record earns nothing and is
    /// indistinguishable from no record, so it is dropped.
    fn store(&mut self, account: &AccountId, staker: StakerState) {
        if staker.is_empty() {
            self.stakers.remove(account);
        } else {
            self.stakers.insert(*account, staker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakevest_types::PRECISION;

    fn acct(n: u64) -> AccountId {
        AccountId::from_index(n)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn single_staker_earns_full_stream() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 1_000, ts(0)).unwrap();
        assert_eq!(engine.earned(&acct(1), ts(100)).unwrap(), 1_000);
        assert_eq!(engine.reward_per_unit(ts(100)).unwrap(), PRECISION);
    }

    #[test]
    fn zero_stake_is_rejected_without_side_effects() {
        let mut engine = RewardEngine::new(10, ts(0));
        assert_eq!(engine.stake(&acct(1), 0, ts(50)), Err(RewardError::ZeroAmount));
        assert!(engine.staker(&acct(1)).is_none());
        assert_eq!(engine.accumulator.last_update_time, ts(0));
    }

    #[test]
    fn checkpoint_follows_protocol_order() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        engine.checkpoint(&acct(1), ts(10)).unwrap();

        let staker = engine.staker(&acct(1)).unwrap();
        assert_eq!(engine.accumulator.last_update_time, ts(10));
        assert_eq!(engine.accumulator.reward_per_unit_stored, PRECISION);
        assert_eq!(staker.reward_per_unit_paid, PRECISION);
        assert_eq!(staker.rewards_owed, 100);
        // Checkpointing again at the same instant changes nothing.
        engine.checkpoint(&acct(1), ts(10)).unwrap();
        assert_eq!(engine.staker(&acct(1)).unwrap().rewards_owed, 100);
    }

    #[test]
    fn late_staker_does_not_share_earlier_rewards() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        engine.stake(&acct(2), 100, ts(100)).unwrap();

        // 0..100: all 1_000 to acct 1. 100..200: 1_000 split evenly.
        assert_eq!(engine.earned(&acct(1), ts(200)).unwrap(), 1_500);
        assert_eq!(engine.earned(&acct(2), ts(200)).unwrap(), 500);
    }

    #[test]
    fn empty_interval_is_not_banked() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(1_000)).unwrap();
        assert_eq!(engine.earned(&acct(1), ts(1_000)).unwrap(), 0);
        assert_eq!(engine.earned(&acct(1), ts(1_010)).unwrap(), 100);
    }

    #[test]
    fn withdraw_more_than_staked_fails() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        let err = engine.withdraw(&acct(1), 101, ts(5)).unwrap_err();
        assert_eq!(
            err,
            RewardError::InsufficientStake {
                requested: 101,
                staked: 100
            }
        );
        assert_eq!(engine.balance_of(&acct(1)), 100);
        assert_eq!(engine.total_staked(), 100);
    }

    #[test]
    fn withdraw_keeps_earned_rewards() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        assert_eq!(engine.withdraw(&acct(1), 100, ts(50)).unwrap(), 0);
        assert_eq!(engine.total_staked(), 0);
        // Nothing staked any more; the 500 earned stays owed.
        assert_eq!(engine.earned(&acct(1), ts(500)).unwrap(), 500);
    }

    #[test]
    fn take_reward_zeroes_owed() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        assert_eq!(engine.take_reward(&acct(1), ts(30)).unwrap(), 300);
        assert_eq!(engine.take_reward(&acct(1), ts(30)).unwrap(), 0);
        assert_eq!(engine.earned(&acct(1), ts(30)).unwrap(), 0);
    }

    #[test]
    fn rate_change_without_checkpoint_reprices_unflushed_interval() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        let previous = engine.set_reward_rate(20);
        assert_eq!(previous, 10);
        // The whole 0..100 interval is priced at the new rate.
        assert_eq!(engine.earned(&acct(1), ts(100)).unwrap(), 2_000);
    }

    #[test]
    fn sync_before_rate_change_preserves_old_rate() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        engine.sync(ts(100)).unwrap();
        engine.set_reward_rate(20);
        assert_eq!(engine.earned(&acct(1), ts(100)).unwrap(), 1_000);
        assert_eq!(engine.earned(&acct(1), ts(150)).unwrap(), 2_000);
    }

    #[test]
    fn restore_undoes_single_account_operation() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();

        let snapshot = engine.snapshot(&acct(2));
        engine.stake(&acct(2), 50, ts(40)).unwrap();
        engine.restore(snapshot);

        assert!(engine.staker(&acct(2)).is_none());
        assert_eq!(engine.total_staked(), 100);
        assert_eq!(engine.accumulator.last_update_time, ts(0));
        assert_eq!(engine.earned(&acct(1), ts(100)).unwrap(), 1_000);
    }

    #[test]
    fn zero_claims_and_withdrawals_leave_no_record() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        for i in 0..1_000u64 {
            let stranger = acct(1_000 + i);
            assert_eq!(engine.take_reward(&stranger, ts(i)).unwrap(), 0);
            assert_eq!(engine.withdraw(&stranger, 0, ts(i)).unwrap(), 0);
            assert!(engine.staker(&stranger).is_none());
        }
        assert_eq!(engine.stakers().count(), 1);
    }

    #[test]
    fn fully_settled_staker_is_dropped() {
        let mut engine = RewardEngine::new(10, ts(0));
        engine.stake(&acct(1), 100, ts(0)).unwrap();
        engine.withdraw(&acct(1), 100, ts(10)).unwrap();
        assert_eq!(engine.staker(&acct(1)).unwrap().rewards_owed, 100);
        assert_eq!(engine.take_reward(&acct(1), ts(20)).unwrap(), 100);
        assert!(engine.staker(&acct(1)).is_none());
        assert_eq!(engine.earned(&acct(1), ts(30)).unwrap(), 0);
    }

    #[test]
    fn unknown_account_has_nothing() {
        let engine = RewardEngine::new(10, ts(0));
        assert_eq!(engine.earned(&acct(9), ts(100)).unwrap(), 0);
        assert_eq!(engine.balance_of(&acct(9)), 0);
    }
}
