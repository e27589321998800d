//! Unified event stream for everything a deployment hosts.

use serde::Serialize;
use stakevest_rewards::PoolEvent;
use stakevest_vesting::VaultEvent;

/// An event from either hosted component, tagged with its source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StakevestEvent {
    Pool(PoolEvent),
    Vault(VaultEvent),
}

impl From<PoolEvent> for StakevestEvent {
    fn from(event: PoolEvent) -> Self {
        Self::Pool(event)
    }
}

impl From<VaultEvent> for StakevestEvent {
    fn from(event: VaultEvent) -> Self {
        Self::Vault(event)
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread, in subscription order.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&StakevestEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&StakevestEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &StakevestEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
