//! The staking pool: the caller-facing shell around [`RewardEngine`].
//!
//! The pool owns the engine, its two assets and an [`AccessGate`]. Each entry
//! point checkpoints and mutates bookkeeping first, then moves tokens. If the
//! token movement fails, the engine is restored from a snapshot taken at the
//! start of the call, so a failed call leaves no trace.

use crate::engine::RewardEngine;
use crate::error::RewardError;
use crate::event::PoolEvent;
use crate::state::StakerState;
use serde::{Deserialize, Serialize};
use stakevest_access::{AccessGate, ReentrancyGuard};
use stakevest_token::FungibleAsset;
use stakevest_types::{AccountId, Timestamp};
use tracing::{info, warn};

/// Behavioural switches for a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolOptions {
    /// Fold elapsed time into the accumulator at the old rate before a rate
    /// change. Off by default, in which case the unflushed interval is priced
    /// at the new rate.
    #[serde(default)]
    pub checkpoint_on_rate_change: bool,
}

pub struct StakingPool<S, R> {
    /// The account holding staked units and reward reserves.
    account: AccountId,
    engine: RewardEngine,
    gate: AccessGate,
    guard: ReentrancyGuard,
    options: PoolOptions,
    staking_token: S,
    reward_token: R,
    events: Vec<PoolEvent>,
}

impl<S: FungibleAsset, R: FungibleAsset> StakingPool<S, R> {
    pub fn new(
        account: AccountId,
        gate: AccessGate,
        staking_token: S,
        reward_token: R,
        reward_rate: u128,
        genesis: Timestamp,
        options: PoolOptions,
    ) -> Self {
        info!(%account, reward_rate, %genesis, "staking pool created");
        Self {
            account,
            engine: RewardEngine::new(reward_rate, genesis),
            gate,
            guard: ReentrancyGuard::new(),
            options,
            staking_token,
            reward_token,
            events: Vec::new(),
        }
    }

    // ── Mutating entry points ──────────────────────────────────────────

    /// Stake `amount`, pulling it from `caller` with `transfer_from`.
    ///
    /// The caller must have approved the pool account for at least `amount`.
    pub fn stake(
        &mut self,
        caller: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        self.gate.require_not_paused()?;
        let pool = self.account;
        let balance = self.settle(caller, |engine, staking, _| {
            let balance = engine.stake(caller, amount, now)?;
            staking.transfer_from(&pool, caller, &pool, amount)?;
            Ok(balance)
        })?;
        let total_staked = self.engine.total_staked();
        info!(account = %caller, amount, balance, total_staked, "staked");
        self.events.push(PoolEvent::Staked {
            account: *caller,
            amount,
            balance,
            total_staked,
            at: now,
        });
        Ok(())
    }

    /// Unstake `amount` and send it back to `caller`. Zero is a bare checkpoint.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        let pool = self.account;
        let balance = self.settle(caller, |engine, staking, _| {
            let balance = engine.withdraw(caller, amount, now)?;
            if amount > 0 {
                staking.transfer(&pool, caller, amount)?;
            }
            Ok(balance)
        })?;
        if amount > 0 {
            let total_staked = self.engine.total_staked();
            info!(account = %caller, amount, balance, total_staked, "withdrawn");
            self.events.push(PoolEvent::Withdrawn {
                account: *caller,
                amount,
                balance,
                total_staked,
                at: now,
            });
        }
        Ok(())
    }

    /// Pay out everything `caller` has earned. Returns the amount paid.
    pub fn get_reward(&mut self, caller: &AccountId, now: Timestamp) -> Result<u128, RewardError> {
        let pool = self.account;
        let paid = self.settle(caller, |engine, _, reward| {
            let owed = engine.take_reward(caller, now)?;
            if owed > 0 {
                reward.transfer(&pool, caller, owed)?;
            }
            Ok(owed)
        })?;
        if paid > 0 {
            info!(account = %caller, amount = paid, "reward paid");
            self.events.push(PoolEvent::RewardPaid {
                account: *caller,
                amount: paid,
                at: now,
            });
        }
        Ok(paid)
    }

    /// Withdraw the whole stake and claim rewards in one call.
    ///
    /// Returns `(withdrawn, reward_paid)`. If the reward payment fails the
    /// stake transfer is sent back and the engine restored.
    pub fn exit(
        &mut self,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<(u128, u128), RewardError> {
        let pool = self.account;
        let staked = self.engine.balance_of(caller);
        let paid = self.settle(caller, |engine, staking, reward| {
            engine.withdraw(caller, staked, now)?;
            let owed = engine.take_reward(caller, now)?;
            if staked > 0 {
                staking.transfer(&pool, caller, staked)?;
            }
            if owed > 0 {
                if let Err(e) = reward.transfer(&pool, caller, owed) {
                    if staked > 0 {
                        staking.transfer(caller, &pool, staked)?;
                    }
                    return Err(e.into());
                }
            }
            Ok(owed)
        })?;
        let total_staked = self.engine.total_staked();
        if staked > 0 {
            self.events.push(PoolEvent::Withdrawn {
                account: *caller,
                amount: staked,
                balance: 0,
                total_staked,
                at: now,
            });
        }
        if paid > 0 {
            self.events.push(PoolEvent::RewardPaid {
                account: *caller,
                amount: paid,
                at: now,
            });
        }
        info!(account = %caller, withdrawn = staked, reward = paid, total_staked, "exited");
        Ok((staked, paid))
    }

    /// Replace the reward rate. Controller only.
    pub fn set_reward_rate(
        &mut self,
        caller: &AccountId,
        rate: u128,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        self.gate.require_controller(caller)?;
        if self.options.checkpoint_on_rate_change {
            self.engine.sync(now)?;
        }
        let previous = self.engine.set_reward_rate(rate);
        info!(previous, current = rate, "reward rate updated");
        self.events.push(PoolEvent::RewardRateUpdated {
            previous,
            current: rate,
            at: now,
        });
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<(), RewardError> {
        self.gate.pause(caller)?;
        self.events.push(PoolEvent::Paused { by: *caller });
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<(), RewardError> {
        self.gate.unpause(caller)?;
        self.events.push(PoolEvent::Unpaused { by: *caller });
        Ok(())
    }

    pub fn transfer_control(
        &mut self,
        caller: &AccountId,
        new_controller: AccountId,
    ) -> Result<(), RewardError> {
        let previous = self.gate.transfer_control(caller, new_controller)?;
        self.events.push(PoolEvent::ControlTransferred {
            previous,
            current: new_controller,
        });
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn earned(&self, account: &AccountId, now: Timestamp) -> Result<u128, RewardError> {
        self.engine.earned(account, now)
    }

    pub fn reward_per_unit(&self, now: Timestamp) -> Result<u128, RewardError> {
        self.engine.reward_per_unit(now)
    }

    pub fn total_staked(&self) -> u128 {
        self.engine.total_staked()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.engine.balance_of(account)
    }

    pub fn reward_rate(&self) -> u128 {
        self.engine.reward_rate()
    }

    pub fn last_update_time(&self) -> Timestamp {
        self.engine.accumulator.last_update_time
    }

    pub fn staker(&self, account: &AccountId) -> Option<&StakerState> {
        self.engine.staker(account)
    }

    pub fn engine(&self) -> &RewardEngine {
        &self.engine
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    pub fn staking_token(&self) -> &S {
        &self.staking_token
    }

    pub fn staking_token_mut(&mut self) -> &mut S {
        &mut self.staking_token
    }

    pub fn reward_token(&self) -> &R {
        &self.reward_token
    }

    pub fn reward_token_mut(&mut self) -> &mut R {
        &mut self.reward_token
    }

    /// Drain buffered events, oldest first.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Internals ──────────────────────────────────────────────────────

    /// Run a single-account operation atomically under the reentrancy guard.
    fn settle<T, F>(&mut self, account: &AccountId, op: F) -> Result<T, RewardError>
    where
        F: FnOnce(&mut RewardEngine, &mut S, &mut R) -> Result<T, RewardError>,
    {
        self.guard.enter()?;
        let snapshot = self.engine.snapshot(account);
        let result = op(&mut self.engine, &mut self.staking_token, &mut self.reward_token);
        if let Err(e) = &result {
            warn!(%account, error = %e, "call rolled back");
            self.engine.restore(snapshot);
        }
        self.guard.exit();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakevest_access::AccessError;
    use stakevest_nullables::NullToken;
    use stakevest_token::TokenError;

    const DAY: u64 = 86_400;

    fn acct(n: u64) -> AccountId {
        AccountId::from_index(n)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn controller() -> AccountId {
        acct(100)
    }

    fn pool_account() -> AccountId {
        acct(200)
    }

    fn make_pool(rate: u128, options: PoolOptions) -> StakingPool<NullToken, NullToken> {
        let mut pool = StakingPool::new(
            pool_account(),
            AccessGate::new(controller()).unwrap(),
            NullToken::new("STK"),
            NullToken::new("RWD"),
            rate,
            ts(0),
            options,
        );
        pool.reward_token_mut()
            .ledger_mut()
            .mint(&pool_account(), 1_000_000_000_000_000_000_000)
            .unwrap();
        pool
    }

    /// Mint `amount` staking units to `who` and approve the pool for them.
    fn fund(pool: &mut StakingPool<NullToken, NullToken>, who: AccountId, amount: u128) {
        let ledger = pool.staking_token_mut().ledger_mut();
        ledger.mint(&who, amount).unwrap();
        ledger.approve(&who, &pool_account(), amount);
    }

    #[test]
    fn five_day_stream_pays_exactly_rate_times_duration() {
        // ~500 reward units (18 decimals) over five days.
        let rate = 1_157_407_407_407_407u128;
        let mut pool = make_pool(rate, PoolOptions::default());
        let staker = acct(1);
        fund(&mut pool, staker, 10_000);
        pool.stake(&staker, 10_000, ts(0)).unwrap();

        let end = ts(5 * DAY);
        let expected = rate * (5 * DAY) as u128;
        assert_eq!(pool.earned(&staker, end).unwrap(), expected);

        let paid = pool.get_reward(&staker, end).unwrap();
        assert_eq!(paid, expected);
        assert_eq!(pool.reward_token().balance_of(&staker), expected);
        assert_eq!(pool.earned(&staker, end).unwrap(), 0);
    }

    #[test]
    fn stake_moves_tokens_into_pool() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 500);
        pool.stake(&acct(1), 300, ts(0)).unwrap();
        assert_eq!(pool.staking_token().balance_of(&acct(1)), 200);
        assert_eq!(pool.staking_token().balance_of(&pool_account()), 300);
        assert_eq!(pool.balance_of(&acct(1)), 300);
        assert_eq!(pool.total_staked(), 300);
    }

    #[test]
    fn stake_without_allowance_rolls_back() {
        let mut pool = make_pool(10, PoolOptions::default());
        pool.staking_token_mut().ledger_mut().mint(&acct(1), 500).unwrap();

        let err = pool.stake(&acct(1), 100, ts(50)).unwrap_err();
        assert!(matches!(err, RewardError::Token(TokenError::InsufficientAllowance { .. })));
        assert_eq!(pool.total_staked(), 0);
        assert!(pool.staker(&acct(1)).is_none());
        assert_eq!(pool.last_update_time(), ts(0));
        assert!(pool.take_events().is_empty());
    }

    #[test]
    fn zero_stake_is_rejected() {
        let mut pool = make_pool(10, PoolOptions::default());
        assert_eq!(pool.stake(&acct(1), 0, ts(0)), Err(RewardError::ZeroAmount));
    }

    #[test]
    fn paused_pool_rejects_stake_but_allows_withdraw() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 200);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        pool.pause(&controller()).unwrap();

        assert_eq!(pool.stake(&acct(1), 100, ts(1)), Err(RewardError::Access(AccessError::Paused)));
        pool.withdraw(&acct(1), 100, ts(2)).unwrap();
        assert_eq!(pool.staking_token().balance_of(&acct(1)), 200);

        pool.unpause(&controller()).unwrap();
        pool.stake(&acct(1), 50, ts(3)).unwrap();
    }

    #[test]
    fn withdraw_more_than_staked_fails() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        let err = pool.withdraw(&acct(1), 101, ts(10)).unwrap_err();
        assert_eq!(
            err,
            RewardError::InsufficientStake {
                requested: 101,
                staked: 100
            }
        );
        assert_eq!(pool.staking_token().balance_of(&pool_account()), 100);
    }

    #[test]
    fn second_claim_pays_nothing() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        assert_eq!(pool.get_reward(&acct(1), ts(100)).unwrap(), 1_000);
        assert_eq!(pool.get_reward(&acct(1), ts(100)).unwrap(), 0);
    }

    #[test]
    fn stranger_claim_leaves_no_staker_record() {
        let mut pool = make_pool(10, PoolOptions::default());
        let stranger = acct(42);
        assert_eq!(pool.get_reward(&stranger, ts(5)).unwrap(), 0);
        pool.withdraw(&stranger, 0, ts(6)).unwrap();
        assert!(pool.staker(&stranger).is_none());
        assert!(pool.take_events().is_empty());
    }

    #[test]
    fn failed_reward_transfer_restores_owed() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();

        pool.reward_token_mut().set_failing(true);
        assert!(matches!(
            pool.get_reward(&acct(1), ts(100)),
            Err(RewardError::Token(_))
        ));
        assert!(!pool.guard.is_entered());
        assert_eq!(pool.earned(&acct(1), ts(100)).unwrap(), 1_000);
        assert_eq!(pool.last_update_time(), ts(0));

        pool.reward_token_mut().set_failing(false);
        assert_eq!(pool.get_reward(&acct(1), ts(100)).unwrap(), 1_000);
    }

    #[test]
    fn underfunded_pool_cannot_pay() {
        let mut pool = StakingPool::new(
            pool_account(),
            AccessGate::new(controller()).unwrap(),
            NullToken::new("STK"),
            NullToken::new("RWD"),
            10,
            ts(0),
            PoolOptions::default(),
        );
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        let err = pool.get_reward(&acct(1), ts(10)).unwrap_err();
        assert!(matches!(err, RewardError::Token(TokenError::InsufficientBalance { .. })));
        assert_eq!(pool.earned(&acct(1), ts(10)).unwrap(), 100);
    }

    #[test]
    fn exit_returns_stake_and_reward() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();

        let (withdrawn, paid) = pool.exit(&acct(1), ts(10)).unwrap();
        assert_eq!((withdrawn, paid), (100, 100));
        assert_eq!(pool.total_staked(), 0);
        assert_eq!(pool.staking_token().balance_of(&acct(1)), 100);
        assert_eq!(pool.reward_token().balance_of(&acct(1)), 100);
    }

    #[test]
    fn exit_with_failing_reward_token_undoes_everything() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();

        pool.reward_token_mut().set_failing(true);
        assert!(pool.exit(&acct(1), ts(10)).is_err());
        assert_eq!(pool.balance_of(&acct(1)), 100);
        assert_eq!(pool.total_staked(), 100);
        assert_eq!(pool.staking_token().balance_of(&pool_account()), 100);
        assert_eq!(pool.staking_token().balance_of(&acct(1)), 0);
        assert_eq!(pool.earned(&acct(1), ts(10)).unwrap(), 100);
    }

    #[test]
    fn only_controller_sets_rate() {
        let mut pool = make_pool(10, PoolOptions::default());
        let err = pool.set_reward_rate(&acct(5), 99, ts(0)).unwrap_err();
        assert_eq!(err, RewardError::Access(AccessError::Unauthorized(acct(5))));
        pool.set_reward_rate(&controller(), 99, ts(0)).unwrap();
        assert_eq!(pool.reward_rate(), 99);
    }

    #[test]
    fn rate_change_reprices_unflushed_time_by_default() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        pool.set_reward_rate(&controller(), 20, ts(100)).unwrap();
        assert_eq!(pool.earned(&acct(1), ts(100)).unwrap(), 2_000);
    }

    #[test]
    fn rate_change_can_flush_first() {
        let options = PoolOptions {
            checkpoint_on_rate_change: true,
        };
        let mut pool = make_pool(10, options);
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        pool.set_reward_rate(&controller(), 20, ts(100)).unwrap();
        assert_eq!(pool.earned(&acct(1), ts(100)).unwrap(), 1_000);
        assert_eq!(pool.earned(&acct(1), ts(110)).unwrap(), 1_200);
    }

    #[test]
    fn events_record_transitions() {
        let mut pool = make_pool(10, PoolOptions::default());
        fund(&mut pool, acct(1), 100);
        pool.stake(&acct(1), 100, ts(0)).unwrap();
        pool.get_reward(&acct(1), ts(1)).unwrap();
        pool.set_reward_rate(&controller(), 5, ts(2)).unwrap();

        let events = pool.take_events();
        assert_eq!(
            events,
            vec![
                PoolEvent::Staked {
                    account: acct(1),
                    amount: 100,
                    balance: 100,
                    total_staked: 100,
                    at: ts(0),
                },
                PoolEvent::RewardPaid {
                    account: acct(1),
                    amount: 10,
                    at: ts(1),
                },
                PoolEvent::RewardRateUpdated {
                    previous: 10,
                    current: 5,
                    at: ts(2),
                },
            ]
        );
        assert!(pool.take_events().is_empty());
    }

    #[test]
    fn control_transfer_moves_rate_privilege() {
        let mut pool = make_pool(10, PoolOptions::default());
        pool.transfer_control(&controller(), acct(7)).unwrap();
        assert!(pool.set_reward_rate(&controller(), 1, ts(0)).is_err());
        pool.set_reward_rate(&acct(7), 1, ts(0)).unwrap();
        assert_eq!(pool.gate().controller(), &acct(7));
    }
}
