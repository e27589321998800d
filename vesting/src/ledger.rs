//! Schedule bookkeeping. No tokens move here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use stakevest_types::math::checked_add;
use stakevest_types::{AccountId, Timestamp};
use tracing::{debug, info};

use crate::error::VestingError;
use crate::schedule::VestingSchedule;

/// Pre-call copy of the one schedule a withdrawal touches.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    account: AccountId,
    schedule: Option<VestingSchedule>,
}

/// All schedules of one vault, bounded in sum by `max_supply`.
///
/// Callers are assumed to be authorized already.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VestingLedger {
    schedules: HashMap<AccountId, VestingSchedule>,
    scheduled_tokens: u128,
    max_supply: u128,
}

impl VestingLedger {
    pub fn new(max_supply: u128) -> Self {
        Self {
            schedules: HashMap::new(),
            scheduled_tokens: 0,
            max_supply,
        }
    }

    /// Register a schedule for `beneficiary`.
    ///
    /// Checks run in a fixed order and the first failure is reported; nothing
    /// changes on error.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        beneficiary: AccountId,
        start_time: Timestamp,
        cliff_time: Timestamp,
        end_time: Timestamp,
        unlock_amount: u128,
        total_amount: u128,
        now: Timestamp,
    ) -> Result<&VestingSchedule, VestingError> {
        if start_time <= now {
            return Err(VestingError::StartNotInFuture { start: start_time, now });
        }
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
        if beneficiary.is_zero() {
            return Err(VestingError::ZeroAddress);
        }
        if self.schedules.contains_key(&beneficiary) {
            return Err(VestingError::ScheduleExists(beneficiary));
        }
        let schedule =
            VestingSchedule::new(start_time, cliff_time, end_time, unlock_amount, total_amount)?;
        let available = self.unallocated();
        if total_amount > available {
            return Err(VestingError::SupplyExceeded {
                requested: total_amount,
                available,
            });
        }

        // Cannot overflow: total_amount <= max_supply - scheduled_tokens.
        let scheduled = self.scheduled_tokens + total_amount;
        self.scheduled_tokens = scheduled;
        info!(
            %beneficiary,
            %start_time,
            %cliff_time,
            %end_time,
            unlock_amount,
            total_amount,
            scheduled_tokens = scheduled,
            "vesting schedule registered"
        );
        Ok(self.schedules.entry(beneficiary).or_insert(schedule))
    }

    /// Record a withdrawal of everything `account` may take at `now`.
    ///
    /// Returns the amount, which may be zero.
    pub fn withdraw(&mut self, account: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        let schedule = self
            .schedules
            .get_mut(account)
            .ok_or(VestingError::NoSchedule(*account))?;
        if now < schedule.start_time {
            return Err(VestingError::StartNotReached {
                start: schedule.start_time,
            });
        }
        if now < schedule.cliff_time {
            return Err(VestingError::StillInCliff {
                cliff: schedule.cliff_time,
            });
        }
        let amount = schedule.withdrawable_amount(now)?;
        schedule.total_withdrawn = checked_add(schedule.total_withdrawn, amount)?;
        debug!(
            %account,
            amount,
            total_withdrawn = schedule.total_withdrawn,
            "vesting withdrawal recorded"
        );
        Ok(amount)
    }

    /// Move `old`'s schedule to `new` wholesale.
    pub fn change_address(&mut self, old: &AccountId, new: AccountId) -> Result<(), VestingError> {
        if !self.schedules.contains_key(old) {
            return Err(VestingError::NoSchedule(*old));
        }
        if new.is_zero() {
            return Err(VestingError::ZeroAddress);
        }
        if self.schedules.contains_key(&new) {
            return Err(VestingError::ScheduleExists(new));
        }
        if let Some(schedule) = self.schedules.remove(old) {
            self.schedules.insert(new, schedule);
        }
        info!(previous = %old, current = %new, "beneficiary changed");
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get(&self, account: &AccountId) -> Option<&VestingSchedule> {
        self.schedules.get(account)
    }

    pub fn has(&self, account: &AccountId) -> bool {
        self.schedules.contains_key(account)
    }

    pub fn scheduled_tokens(&self) -> u128 {
        self.scheduled_tokens
    }

    pub fn max_supply(&self) -> u128 {
        self.max_supply
    }

    /// Supply not yet committed to any schedule.
    pub fn unallocated(&self) -> u128 {
        self.max_supply.saturating_sub(self.scheduled_tokens)
    }

    /// Zero for accounts without a schedule.
    pub fn withdrawable(&self, account: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        match self.schedules.get(account) {
            Some(schedule) => Ok(schedule.withdrawable_amount(now)?),
            None => Ok(0),
        }
    }

    pub fn schedules(&self) -> impl Iterator<Item = (&AccountId, &VestingSchedule)> {
        self.schedules.iter()
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    pub fn snapshot(&self, account: &AccountId) -> LedgerSnapshot {
        LedgerSnapshot {
            account: *account,
            schedule: self.schedules.get(account).cloned(),
        }
    }

    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        match snapshot.schedule {
            Some(schedule) => {
                self.schedules.insert(snapshot.account, schedule);
            }
            None => {
                self.schedules.remove(&snapshot.account);
            }
        }
    }
}
