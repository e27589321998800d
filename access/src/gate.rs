//! Single-controller gate with a global suspension switch.

use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use stakevest_types::AccountId;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGate {
    controller: AccountId,
    paused: bool,
}

impl AccessGate {
    pub fn new(controller: AccountId) -> Result<Self, AccessError> {
        if controller.is_zero() {
            return Err(AccessError::ZeroController);
        }
        Ok(Self {
            controller,
            paused: false,
        })
    }

    pub fn controller(&self) -> &AccountId {
        &self.controller
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reject anyone but the controller, naming the rejected caller.
    pub fn require_controller(&self, caller: &AccountId) -> Result<(), AccessError> {
        if *caller != self.controller {
            return Err(AccessError::Unauthorized(*caller));
        }
        Ok(())
    }

    pub fn require_not_paused(&self) -> Result<(), AccessError> {
        if self.paused {
            return Err(AccessError::Paused);
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<(), AccessError> {
        self.require_controller(caller)?;
        if self.paused {
            return Err(AccessError::AlreadyPaused);
        }
        self.paused = true;
        info!(by = %caller, "paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<(), AccessError> {
        self.require_controller(caller)?;
        if !self.paused {
            return Err(AccessError::NotPaused);
        }
        self.paused = false;
        info!(by = %caller, "unpaused");
        Ok(())
    }

    /// Hand control to `new_controller`. Returns the previous controller.
    pub fn transfer_control(
        &mut self,
        caller: &AccountId,
        new_controller: AccountId,
    ) -> Result<AccountId, AccessError> {
        self.require_controller(caller)?;
        if new_controller.is_zero() {
            return Err(AccessError::ZeroController);
        }
        let previous = std::mem::replace(&mut self.controller, new_controller);
        info!(%previous, current = %new_controller, "control transferred");
        Ok(previous)
    }
}
