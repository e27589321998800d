//! Events emitted by the vesting vault.

use serde::{Deserialize, Serialize};
use stakevest_types::{AccountId, Timestamp};

use crate::schedule::VestingSchedule;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VaultEvent {
    ScheduleRegistered {
        beneficiary: AccountId,
        schedule: VestingSchedule,
        scheduled_tokens: u128,
    },
    Withdrawn {
        beneficiary: AccountId,
        amount: u128,
        total_withdrawn: u128,
        at: Timestamp,
    },
    /// The schedule moved wholesale, `total_withdrawn` included.
    BeneficiaryChanged {
        previous: AccountId,
        current: AccountId,
    },
    Paused {
        by: AccountId,
    },
    Unpaused {
        by: AccountId,
    },
    ControlTransferred {
        previous: AccountId,
        current: AccountId,
    },
}
