//! Events emitted by the staking pool.

use serde::{Deserialize, Serialize};
use stakevest_types::{AccountId, Timestamp};

/// Observable state transitions of a [`StakingPool`](crate::StakingPool).
///
/// Each event carries the post-call values needed to replay the pool's
/// balances from an event log alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    Staked {
        account: AccountId,
        amount: u128,
        balance: u128,
        total_staked: u128,
        at: Timestamp,
    },
    Withdrawn {
        account: AccountId,
        amount: u128,
        balance: u128,
        total_staked: u128,
        at: Timestamp,
    },
    RewardPaid {
        account: AccountId,
        amount: u128,
        at: Timestamp,
    },
    RewardRateUpdated {
        previous: u128,
        current: u128,
        at: Timestamp,
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
