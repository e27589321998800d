//! Staking rewards: a continuous-time reward-per-unit accumulator.
//!
//! A fixed `reward_rate` is streamed to whoever is staked, pro rata to stake
//! and time. Instead of touching every staker on every change, a single global
//! counter tracks the reward earned by one staked unit since genesis:
//!
//! `reward_per_unit(t) = stored + (t − last_update) × rate × PRECISION / total_staked`
//!
//! Each staker remembers the counter value at its last checkpoint, so its
//! entitlement is `balance × (reward_per_unit − paid) / PRECISION + owed`.
//!
//! This crate handles:
//! - The accumulator and per-staker checkpoints ([`RewardEngine`])
//! - Stake, withdraw, claim and exit with token movement ([`StakingPool`])
//! - Controller-gated rate changes and pausing

pub mod accumulator;
pub mod engine;
pub mod error;
pub mod event;
pub mod pool;
pub mod state;

pub use accumulator::RewardAccumulator;
pub use engine::{EngineSnapshot, RewardEngine};
pub use error::RewardError;
pub use event::PoolEvent;
pub use pool::{PoolOptions, StakingPool};
pub use state::StakerState;
