//! Wiring a [`DeploymentConfig`] into a live pool and vault.

use serde::{Deserialize, Serialize};
use stakevest_access::AccessGate;
use stakevest_rewards::{PoolOptions, StakingPool};
use stakevest_token::TokenLedger;
use stakevest_types::{AccountId, Timestamp};
use stakevest_vesting::VestingVault;
use tracing::info;

use crate::config::DeploymentConfig;
use crate::event::{EventBus, StakevestEvent};
use crate::NodeError;

/// The three assets a deployment manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Staking,
    Reward,
    Vesting,
}

/// A staking pool and a vesting vault under one controller.
///
/// The two components share nothing but the controller identity and the
/// event bus.
pub struct Deployment {
    controller: AccountId,
    genesis: Timestamp,
    pool: StakingPool<TokenLedger, TokenLedger>,
    vault: VestingVault<TokenLedger>,
    bus: EventBus,
}

impl Deployment {
    /// Mint initial balances, build the pool and vault, and register the
    /// configured schedules as of `config.genesis`.
    pub fn from_config(config: &DeploymentConfig) -> Result<Self, NodeError> {
        let controller = config.controller;
        let staking_cfg = &config.staking;
        let vesting_cfg = &config.vesting;

        let mut staking_token = TokenLedger::new("STK");
        for balance in &config.balances {
            staking_token.mint(&balance.account, balance.amount)?;
        }
        let mut reward_token = TokenLedger::new("RWD");
        reward_token.mint(&staking_cfg.pool_account, staking_cfg.reward_funding)?;
        let mut vesting_token = TokenLedger::new("VST");
        vesting_token.mint(&vesting_cfg.vault_account, vesting_cfg.funding)?;

        let options = PoolOptions {
            checkpoint_on_rate_change: staking_cfg.checkpoint_on_rate_change,
        };
        let mut pool = StakingPool::new(
            staking_cfg.pool_account,
            AccessGate::new(controller)?,
            staking_token,
            reward_token,
            staking_cfg.reward_rate,
            config.genesis,
            options,
        );
        if staking_cfg.start_paused {
            pool.pause(&controller)?;
        }

        let mut vault = VestingVault::new(
            vesting_cfg.vault_account,
            AccessGate::new(controller)?,
            vesting_token,
        );
        for s in &vesting_cfg.schedules {
            vault.register_vesting_schedule(
                &controller,
                s.beneficiary,
                s.start,
                s.cliff,
                s.end,
                s.unlock,
                s.total,
                config.genesis,
            )?;
        }

        info!(
            %controller,
            genesis = %config.genesis,
            pool = %staking_cfg.pool_account,
            vault = %vesting_cfg.vault_account,
            schedules = vesting_cfg.schedules.len(),
            "deployment ready"
        );
        Ok(Self {
            controller,
            genesis: config.genesis,
            pool,
            vault,
            bus: EventBus::new(),
        })
    }

    pub fn controller(&self) -> &AccountId {
        &self.controller
    }

    pub fn genesis(&self) -> Timestamp {
        self.genesis
    }

    pub fn pool(&self) -> &StakingPool<TokenLedger, TokenLedger> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut StakingPool<TokenLedger, TokenLedger> {
        &mut self.pool
    }

    pub fn vault(&self) -> &VestingVault<TokenLedger> {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut VestingVault<TokenLedger> {
        &mut self.vault
    }

    pub fn token(&self, kind: TokenKind) -> &TokenLedger {
        match kind {
            TokenKind::Staking => self.pool.staking_token(),
            TokenKind::Reward => self.pool.reward_token(),
            TokenKind::Vesting => self.vault.token(),
        }
    }

    pub fn token_mut(&mut self, kind: TokenKind) -> &mut TokenLedger {
        match kind {
            TokenKind::Staking => self.pool.staking_token_mut(),
            TokenKind::Reward => self.pool.reward_token_mut(),
            TokenKind::Vesting => self.vault.token_mut(),
        }
    }

    /// The account a holder approves to pull `kind`.
    pub fn spender_for(&self, kind: TokenKind) -> AccountId {
        match kind {
            TokenKind::Staking | TokenKind::Reward => *self.pool.account(),
            TokenKind::Vesting => *self.vault.account(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakevestEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    /// Drain both components' buffered events, pool first, fan them out to
    /// subscribers and return them.
    pub fn publish_events(&mut self) -> Vec<StakevestEvent> {
        let events: Vec<StakevestEvent> = self
            .pool
            .take_events()
            .into_iter()
            .map(StakevestEvent::from)
            .chain(self.vault.take_events().into_iter().map(StakevestEvent::from))
            .collect();
        for event in &events {
            self.bus.emit(event);
        }
        events
    }
}
