//! Vesting errors.

use stakevest_access::AccessError;
use stakevest_token::TokenError;
use stakevest_types::{AccountId, MathError, Timestamp};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VestingError {
    #[error("schedule start {start} must be after {now}")]
    StartNotInFuture { start: Timestamp, now: Timestamp },

    #[error("cliff {cliff} precedes start {start}")]
    CliffBeforeStart { start: Timestamp, cliff: Timestamp },

    #[error("end {end} precedes cliff {cliff}")]
    EndBeforeCliff { cliff: Timestamp, end: Timestamp },

    #[error("beneficiary is the zero address")]
    ZeroAddress,

    #[error("{0} already has a vesting schedule")]
    ScheduleExists(AccountId),

    #[error("unlock amount {unlock} exceeds total {total}")]
    UnlockExceedsTotal { unlock: u128, total: u128 },

    #[error("supply exceeded: requested {requested}, {available} unallocated")]
    SupplyExceeded { requested: u128, available: u128 },

    #[error("{0} has no vesting schedule")]
    NoSchedule(AccountId),

    #[error("vesting has not started (starts at {start})")]
    StartNotReached { start: Timestamp },

    #[error("still in cliff (cliff at {cliff})")]
    StillInCliff { cliff: Timestamp },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("token transfer failed: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Access(#[from] AccessError),
}
