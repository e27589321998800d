//! stakevest node: hosts a staking pool and a vesting vault side by side.
//!
//! The node is the wiring layer that:
//! - Loads a TOML [`DeploymentConfig`]
//! - Mints initial balances and builds both components ([`Deployment`])
//! - Fans component events out through an [`EventBus`]
//! - Replays scripted scenarios against a deterministic clock ([`Simulation`])

pub mod config;
pub mod deployment;
pub mod error;
pub mod event;
pub mod logging;
pub mod scenario;

pub use config::{BalanceConfig, DeploymentConfig, ScheduleConfig, StakingConfig, VestingConfig};
pub use deployment::{Deployment, TokenKind};
pub use error::NodeError;
pub use event::{EventBus, StakevestEvent};
pub use logging::{init_logging, LogFormat};
pub use scenario::{Script, Simulation, Step, StepReport, Target};
