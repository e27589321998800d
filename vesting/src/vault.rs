//! The vesting vault: the caller-facing shell around [`VestingLedger`].
//!
//! The vault holds the vested token. Its supply cap is the token balance it
//! holds when constructed, so fund it first.

use stakevest_access::{AccessGate, ReentrancyGuard};
use stakevest_token::FungibleAsset;
use stakevest_types::{AccountId, Timestamp};
use tracing::{info, warn};

use crate::error::VestingError;
use crate::event::VaultEvent;
use crate::ledger::VestingLedger;
use crate::schedule::VestingSchedule;

pub struct VestingVault<T> {
    account: AccountId,
    ledger: VestingLedger,
    gate: AccessGate,
    guard: ReentrancyGuard,
    token: T,
    events: Vec<VaultEvent>,
}

impl<T: FungibleAsset> VestingVault<T> {
    pub fn new(account: AccountId, gate: AccessGate, token: T) -> Self {
        let max_supply = token.balance_of(&account);
        info!(%account, max_supply, "vesting vault created");
        Self {
            account,
            ledger: VestingLedger::new(max_supply),
            gate,
            guard: ReentrancyGuard::new(),
            token,
            events: Vec::new(),
        }
    }

    /// Register a schedule for `beneficiary`. Controller only.
    #[allow(clippy::too_many_arguments)]
    pub fn register_vesting_schedule(
        &mut self,
        caller: &AccountId,
        beneficiary: AccountId,
        start_time: Timestamp,
        cliff_time: Timestamp,
        end_time: Timestamp,
        unlock_amount: u128,
        total_amount: u128,
        now: Timestamp,
    ) -> Result<(), VestingError> {
        self.gate.require_controller(caller)?;
        let schedule = self
            .ledger
            .register(
                beneficiary,
                start_time,
                cliff_time,
                end_time,
                unlock_amount,
                total_amount,
                now,
            )?
            .clone();
        self.events.push(VaultEvent::ScheduleRegistered {
            beneficiary,
            schedule,
            scheduled_tokens: self.ledger.scheduled_tokens(),
        });
        Ok(())
    }

    /// Send `caller` everything vested and not yet withdrawn.
    ///
    /// Returns the amount sent. Zero succeeds without a transfer or event.
    pub fn withdraw(&mut self, caller: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        self.gate.require_not_paused()?;
        self.guard.enter()?;
        let snapshot = self.ledger.snapshot(caller);
        let result = self.ledger.withdraw(caller, now).and_then(|amount| {
            if amount > 0 {
                self.token.transfer(&self.account, caller, amount)?;
            }
            Ok(amount)
        });
        self.guard.exit();

        let amount = match result {
            Ok(amount) => amount,
            Err(e) => {
                warn!(account = %caller, error = %e, "vesting withdrawal rolled back");
                self.ledger.restore(snapshot);
                return Err(e);
            }
        };
        if amount > 0 {
            let total_withdrawn = self
                .ledger
                .get(caller)
                .map(|s| s.total_withdrawn)
                .unwrap_or(amount);
            info!(account = %caller, amount, total_withdrawn, "vested tokens withdrawn");
            self.events.push(VaultEvent::Withdrawn {
                beneficiary: *caller,
                amount,
                total_withdrawn,
                at: now,
            });
        }
        Ok(amount)
    }

    /// Hand `caller`'s schedule to `new_address`. No tokens move.
    pub fn change_address(
        &mut self,
        caller: &AccountId,
        new_address: AccountId,
    ) -> Result<(), VestingError> {
        self.gate.require_not_paused()?;
        self.ledger.change_address(caller, new_address)?;
        self.events.push(VaultEvent::BeneficiaryChanged {
            previous: *caller,
            current: new_address,
        });
        Ok(())
    }

    pub fn pause(&mut self, caller: &AccountId) -> Result<(), VestingError> {
        self.gate.pause(caller)?;
        self.events.push(VaultEvent::Paused { by: *caller });
        Ok(())
    }

    pub fn unpause(&mut self, caller: &AccountId) -> Result<(), VestingError> {
        self.gate.unpause(caller)?;
        self.events.push(VaultEvent::Unpaused { by: *caller });
        Ok(())
    }

    pub fn transfer_control(
        &mut self,
        caller: &AccountId,
        new_controller: AccountId,
    ) -> Result<(), VestingError> {
        let previous = self.gate.transfer_control(caller, new_controller)?;
        self.events.push(VaultEvent::ControlTransferred {
            previous,
            current: new_controller,
        });
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn get_vesting_schedule(&self, account: &AccountId) -> Option<&VestingSchedule> {
        self.ledger.get(account)
    }

    pub fn has_vesting_schedule(&self, account: &AccountId) -> bool {
        self.ledger.has(account)
    }

    pub fn scheduled_tokens(&self) -> u128 {
        self.ledger.scheduled_tokens()
    }

    pub fn max_supply(&self) -> u128 {
        self.ledger.max_supply()
    }

    pub fn withdrawable(&self, account: &AccountId, now: Timestamp) -> Result<u128, VestingError> {
        self.ledger.withdrawable(account, now)
    }

    pub fn ledger(&self) -> &VestingLedger {
        &self.ledger
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn take_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakevest_access::AccessError;
    use stakevest_nullables::NullToken;
    use stakevest_token::TokenError;

    const DAY: u64 = 86_400;
    const E18: u128 = 1_000_000_000_000_000_000;
    const START: u64 = 1_000;

    fn acct(n: u64) -> AccountId {
        AccountId::from_index(n)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn controller() -> AccountId {
        acct(100)
    }

    fn vault_account() -> AccountId {
        acct(300)
    }

    fn cliff() -> Timestamp {
        ts(START + 30 * DAY)
    }

    fn end() -> Timestamp {
        ts(START + 365 * DAY)
    }

    fn funded_vault(funding: u128) -> VestingVault<NullToken> {
        let mut token = NullToken::new("VST");
        token.ledger_mut().mint(&vault_account(), funding).unwrap();
        VestingVault::new(vault_account(), AccessGate::new(controller()).unwrap(), token)
    }

    fn register(vault: &mut VestingVault<NullToken>, who: AccountId) -> Result<(), VestingError> {
        vault.register_vesting_schedule(
            &controller(),
            who,
            ts(START),
            cliff(),
            end(),
            2 * E18 / 10,
            E18,
            ts(0),
        )
    }

    #[test]
    fn max_supply_is_vault_balance_at_creation() {
        let mut vault = funded_vault(3 * E18);
        assert_eq!(vault.max_supply(), 3 * E18);
        vault.token_mut().ledger_mut().mint(&vault_account(), E18).unwrap();
        assert_eq!(vault.max_supply(), 3 * E18);
    }

    #[test]
    fn only_controller_registers() {
        let mut vault = funded_vault(E18);
        let err = vault
            .register_vesting_schedule(&acct(9), acct(1), ts(START), cliff(), end(), 0, 1, ts(0))
            .unwrap_err();
        assert_eq!(err, VestingError::Access(AccessError::Unauthorized(acct(9))));
        assert!(!vault.has_vesting_schedule(&acct(1)));
    }

    #[test]
    fn cliff_then_midpoint_withdrawals() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();

        assert!(matches!(
            vault.withdraw(&acct(1), ts(cliff().as_secs() - 1)),
            Err(VestingError::StillInCliff { .. })
        ));
        assert_eq!(vault.withdraw(&acct(1), cliff()).unwrap(), 2 * E18 / 10);

        let span = end().as_secs() - cliff().as_secs();
        let midpoint = cliff().plus_secs(span / 2);
        assert_eq!(vault.withdraw(&acct(1), midpoint).unwrap(), (E18 - 2 * E18 / 10) / 2);
        assert_eq!(vault.token().balance_of(&acct(1)), 6 * E18 / 10);
    }

    #[test]
    fn changed_address_nets_out_prior_withdrawal() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();
        vault.withdraw(&acct(1), cliff()).unwrap();

        vault.change_address(&acct(1), acct(2)).unwrap();
        assert!(matches!(vault.withdraw(&acct(1), end()), Err(VestingError::NoSchedule(_))));
        assert_eq!(vault.withdraw(&acct(2), end()).unwrap(), 8 * E18 / 10);
        assert_eq!(vault.token().balance_of(&acct(1)), 2 * E18 / 10);
        assert_eq!(vault.token().balance_of(&acct(2)), 8 * E18 / 10);
        assert_eq!(vault.token().balance_of(&vault_account()), 0);
    }

    #[test]
    fn zero_withdrawal_is_silent() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();
        vault.withdraw(&acct(1), cliff()).unwrap();
        vault.take_events();

        assert_eq!(vault.withdraw(&acct(1), cliff()).unwrap(), 0);
        assert!(vault.take_events().is_empty());
        assert_eq!(vault.token().transfer_count(), 1);
    }

    #[test]
    fn failed_transfer_rolls_back_withdrawal() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();
        vault.token_mut().set_failing(true);

        assert!(matches!(
            vault.withdraw(&acct(1), end()),
            Err(VestingError::Token(TokenError::Rejected(_)))
        ));
        assert!(!vault.guard.is_entered());
        assert_eq!(vault.get_vesting_schedule(&acct(1)).unwrap().total_withdrawn, 0);
        assert_eq!(vault.withdrawable(&acct(1), end()).unwrap(), E18);

        vault.token_mut().set_failing(false);
        assert_eq!(vault.withdraw(&acct(1), end()).unwrap(), E18);
    }

    #[test]
    fn pause_blocks_withdraw_and_relocation() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();
        vault.pause(&controller()).unwrap();

        assert_eq!(
            vault.withdraw(&acct(1), end()),
            Err(VestingError::Access(AccessError::Paused))
        );
        assert_eq!(
            vault.change_address(&acct(1), acct(2)),
            Err(VestingError::Access(AccessError::Paused))
        );

        vault.unpause(&controller()).unwrap();
        vault.change_address(&acct(1), acct(2)).unwrap();
    }

    #[test]
    fn events_describe_lifecycle() {
        let mut vault = funded_vault(E18);
        register(&mut vault, acct(1)).unwrap();
        vault.withdraw(&acct(1), cliff()).unwrap();
        vault.change_address(&acct(1), acct(2)).unwrap();

        let events = vault.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            VaultEvent::ScheduleRegistered { beneficiary, scheduled_tokens, .. }
                if *beneficiary == acct(1) && *scheduled_tokens == E18
        ));
        assert_eq!(
            events[1],
            VaultEvent::Withdrawn {
                beneficiary: acct(1),
                amount: 2 * E18 / 10,
                total_withdrawn: 2 * E18 / 10,
                at: cliff(),
            }
        );
        assert_eq!(
            events[2],
            VaultEvent::BeneficiaryChanged {
                previous: acct(1),
                current: acct(2),
            }
        );
    }

    #[test]
    fn control_transfer_hands_over_registration() {
        let mut vault = funded_vault(E18);
        vault.transfer_control(&controller(), acct(7)).unwrap();
        assert!(register(&mut vault, acct(1)).is_err());
        vault
            .register_vesting_schedule(&acct(7), acct(1), ts(START), cliff(), end(), 0, E18, ts(0))
            .unwrap();
    }
}
