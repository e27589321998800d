//! Scripted replay of operations against a [`Deployment`].
//!
//! A script is a TOML list of `[[step]]` tables, each tagged by `action`:
//!
//! ```toml
//! [[step]]
//! action = "approve"
//! token = "staking"
//! owner = "0x0000000000000000000000000000000000000002"
//! amount = 10000
//!
//! [[step]]
//! action = "stake"
//! account = "0x0000000000000000000000000000000000000002"
//! amount = 10000
//!
//! [[step]]
//! action = "advance"
//! secs = 432000
//!
//! [[step]]
//! action = "claim"
//! account = "0x0000000000000000000000000000000000000002"
//! ```
//!
//! Time comes from a [`NullClock`] that starts at the deployment's genesis
//! and only moves on `advance`. A failing step is reported and the script
//! carries on.

use serde::{Deserialize, Serialize};
use std::path::Path;

use stakevest_nullables::NullClock;
use stakevest_token::FungibleAsset;
use stakevest_types::amount::serde_str;
use stakevest_types::{AccountId, Clock, Timestamp};
use stakevest_utils::format_duration;
use tracing::{debug, warn};

use crate::deployment::{Deployment, TokenKind};
use crate::event::StakevestEvent;
use crate::NodeError;

/// Which component a pause-style step targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Pool,
    Vault,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Advance {
        secs: u64,
    },
    Mint {
        token: TokenKind,
        account: AccountId,
        #[serde(with = "serde_str")]
        amount: u128,
    },
    /// Approve the component that pulls `token` (the pool for staking).
    Approve {
        token: TokenKind,
        owner: AccountId,
        #[serde(with = "serde_str")]
        amount: u128,
    },
    Stake {
        account: AccountId,
        #[serde(with = "serde_str")]
        amount: u128,
    },
    Withdraw {
        account: AccountId,
        #[serde(with = "serde_str")]
        amount: u128,
    },
    Claim {
        account: AccountId,
    },
    Exit {
        account: AccountId,
    },
    SetRate {
        #[serde(default)]
        caller: Option<AccountId>,
        #[serde(with = "serde_str")]
        rate: u128,
    },
    Pause {
        target: Target,
        #[serde(default)]
        caller: Option<AccountId>,
    },
    Unpause {
        target: Target,
        #[serde(default)]
        caller: Option<AccountId>,
    },
    /// Times are offsets in seconds from the current clock.
    Register {
        #[serde(default)]
        caller: Option<AccountId>,
        beneficiary: AccountId,
        start_in: u64,
        cliff_in: u64,
        end_in: u64,
        #[serde(default, with = "serde_str")]
        unlock: u128,
        #[serde(with = "serde_str")]
        total: u128,
    },
    VestWithdraw {
        account: AccountId,
    },
    ChangeAddress {
        account: AccountId,
        new_address: AccountId,
    },
    Query {
        account: AccountId,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Advance { .. } => "advance",
            Step::Mint { .. } => "mint",
            Step::Approve { .. } => "approve",
            Step::Stake { .. } => "stake",
            Step::Withdraw { .. } => "withdraw",
            Step::Claim { .. } => "claim",
            Step::Exit { .. } => "exit",
            Step::SetRate { .. } => "set-rate",
            Step::Pause { .. } => "pause",
            Step::Unpause { .. } => "unpause",
            Step::Register { .. } => "register",
            Step::VestWithdraw { .. } => "vest-withdraw",
            Step::ChangeAddress { .. } => "change-address",
            Step::Query { .. } => "query",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Script(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Script(e.to_string()))
    }
}

/// Outcome of one replayed step.
#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub at: Timestamp,
    pub ok: bool,
    pub detail: String,
    pub events: Vec<StakevestEvent>,
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.ok { "ok" } else { "FAILED" };
        write!(
            f,
            "[{:>3}] t={} {:<14} {:<6} {}",
            self.index, self.at, self.action, status, self.detail
        )
    }
}

pub struct Simulation {
    deployment: Deployment,
    clock: NullClock,
}

impl Simulation {
    pub fn new(deployment: Deployment) -> Self {
        let clock = NullClock::new(deployment.genesis().as_secs());
        Self { deployment, clock }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Replay every step in order. Events buffered before the first step
    /// (e.g. registrations from the config) are published with step 0.
    pub fn run(&mut self, script: &Script) -> Vec<StepReport> {
        script
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.apply(i, step))
            .collect()
    }

    pub fn apply(&mut self, index: usize, step: &Step) -> StepReport {
        let result = self.execute(step);
        let at = self.clock.now();
        let events = self.deployment.publish_events();
        let (ok, detail) = match result {
            Ok(detail) => {
                debug!(index, action = step.name(), %detail, "step applied");
                (true, detail)
            }
            Err(e) => {
                warn!(index, action = step.name(), error = %e, "step failed");
                (false, e.to_string())
            }
        };
        StepReport {
            index,
            action: step.name(),
            at,
            ok,
            detail,
            events,
        }
    }

    fn execute(&mut self, step: &Step) -> Result<String, NodeError> {
        let now = self.clock.now();
        let controller = *self.deployment.controller();
        let d = &mut self.deployment;

        let detail = match step {
            Step::Advance { secs } => {
                self.clock.advance(*secs);
                format!("advanced {}", format_duration(*secs))
            }
            Step::Mint { token, account, amount } => {
                d.token_mut(*token).mint(account, *amount)?;
                format!("minted {amount} to {account}")
            }
            Step::Approve { token, owner, amount } => {
                let spender = d.spender_for(*token);
                d.token_mut(*token).approve(owner, &spender, *amount);
                format!("{owner} approved {spender} for {amount}")
            }
            Step::Stake { account, amount } => {
                d.pool_mut().stake(account, *amount, now)?;
                format!("staked {amount}, balance {}", d.pool().balance_of(account))
            }
            Step::Withdraw { account, amount } => {
                d.pool_mut().withdraw(account, *amount, now)?;
                format!("withdrew {amount}, balance {}", d.pool().balance_of(account))
            }
            Step::Claim { account } => {
                let paid = d.pool_mut().get_reward(account, now)?;
                format!("paid {paid}")
            }
            Step::Exit { account } => {
                let (withdrawn, paid) = d.pool_mut().exit(account, now)?;
                format!("withdrew {withdrawn}, paid {paid}")
            }
            Step::SetRate { caller, rate } => {
                d.pool_mut().set_reward_rate(&caller.unwrap_or(controller), *rate, now)?;
                format!("rate {rate}")
            }
            Step::Pause { target, caller } => {
                let caller = caller.unwrap_or(controller);
                match target {
                    Target::Pool => d.pool_mut().pause(&caller)?,
                    Target::Vault => d.vault_mut().pause(&caller)?,
                }
                format!("{target:?} paused")
            }
            Step::Unpause { target, caller } => {
                let caller = caller.unwrap_or(controller);
                match target {
                    Target::Pool => d.pool_mut().unpause(&caller)?,
                    Target::Vault => d.vault_mut().unpause(&caller)?,
                }
                format!("{target:?} unpaused")
            }
            Step::Register {
                caller,
                beneficiary,
                start_in,
                cliff_in,
                end_in,
                unlock,
                total,
            } => {
                d.vault_mut().register_vesting_schedule(
                    &caller.unwrap_or(controller),
                    *beneficiary,
                    now.plus_secs(*start_in),
                    now.plus_secs(*cliff_in),
                    now.plus_secs(*end_in),
                    *unlock,
                    *total,
                    now,
                )?;
                format!("scheduled {total} for {beneficiary}")
            }
            Step::VestWithdraw { account } => {
                let amount = d.vault_mut().withdraw(account, now)?;
                format!("released {amount}")
            }
            Step::ChangeAddress { account, new_address } => {
                d.vault_mut().change_address(account, *new_address)?;
                format!("{account} -> {new_address}")
            }
            Step::Query { account } => {
                let pool = d.pool();
                let vault = d.vault();
                format!(
                    "staked={} earned={} vesting_withdrawable={} stk={} rwd={} vst={}",
                    pool.balance_of(account),
                    pool.earned(account, now)?,
                    vault.withdrawable(account, now)?,
                    d.token(TokenKind::Staking).balance_of(account),
                    d.token(TokenKind::Reward).balance_of(account),
                    d.token(TokenKind::Vesting).balance_of(account),
                )
            }
        };
        Ok(detail)
    }
}
