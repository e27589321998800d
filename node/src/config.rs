//! Deployment configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use stakevest_types::amount::serde_str;
use stakevest_types::{AccountId, Timestamp};

use crate::NodeError;

/// Everything needed to stand up a staking pool and a vesting vault.
///
/// Can be loaded from a TOML file via [`DeploymentConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Amounts may be written as
/// integers or, when they exceed TOML's integer range, as decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Controller of both the pool and the vault.
    #[serde(default = "default_controller")]
    pub controller: AccountId,

    /// Deployment time; the pool's accumulator starts here and vesting
    /// schedules registered at deployment must start after it.
    #[serde(default)]
    pub genesis: Timestamp,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub staking: StakingConfig,

    #[serde(default)]
    pub vesting: VestingConfig,

    /// Initial staking-token balances.
    #[serde(default)]
    pub balances: Vec<BalanceConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Account holding staked units and the reward reserve.
    #[serde(default = "default_pool_account")]
    pub pool_account: AccountId,

    /// Reward units streamed per second.
    #[serde(default = "default_reward_rate", with = "serde_str")]
    pub reward_rate: u128,

    /// Reward tokens minted to the pool account at deployment.
    #[serde(default = "default_reward_funding", with = "serde_str")]
    pub reward_funding: u128,

    #[serde(default)]
    pub checkpoint_on_rate_change: bool,

    #[serde(default)]
    pub start_paused: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingConfig {
    #[serde(default = "default_vault_account")]
    pub vault_account: AccountId,

    /// Vesting tokens minted to the vault before it snapshots its supply cap.
    #[serde(default, with = "serde_str")]
    pub funding: u128,

    #[serde(default)]
    pub schedules: Vec<ScheduleConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub beneficiary: AccountId,
    pub start: Timestamp,
    pub cliff: Timestamp,
    pub end: Timestamp,
    #[serde(default, with = "serde_str")]
    pub unlock: u128,
    #[serde(with = "serde_str")]
    pub total: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub account: AccountId,
    #[serde(with = "serde_str")]
    pub amount: u128,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_controller() -> AccountId {
    AccountId::from_index(1)
}

fn default_pool_account() -> AccountId {
    AccountId::from_index(0x5000)
}

fn default_vault_account() -> AccountId {
    AccountId::from_index(0x7000)
}

/// Roughly 500 whole tokens (18 decimals) over five days.
fn default_reward_rate() -> u128 {
    1_157_407_407_407_407
}

fn default_reward_funding() -> u128 {
    1_000_000 * 1_000_000_000_000_000_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DeploymentConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            controller: default_controller(),
            genesis: Timestamp::EPOCH,
            log_format: default_log_format(),
            log_level: default_log_level(),
            staking: StakingConfig::default(),
            vesting: VestingConfig::default(),
            balances: Vec::new(),
        }
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            pool_account: default_pool_account(),
            reward_rate: default_reward_rate(),
            reward_funding: default_reward_funding(),
            checkpoint_on_rate_change: false,
            start_paused: false,
        }
    }
}

impl Default for VestingConfig {
    fn default() -> Self {
        Self {
            vault_account: default_vault_account(),
            funding: 0,
            schedules: Vec::new(),
        }
    }
}
