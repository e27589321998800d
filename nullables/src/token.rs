//! Nullable token: a ledger whose transfers can be made to fail on demand.

use stakevest_token::{FungibleAsset, TokenError, TokenLedger};
use stakevest_types::AccountId;

/// Wraps a [`TokenLedger`] and refuses transfers while failing is switched on.
///
/// Used to exercise rollback paths: the collaborator fails after the caller
/// has already updated its own bookkeeping.
#[derive(Clone, Debug)]
pub struct NullToken {
    ledger: TokenLedger,
    failing: bool,
    transfers: usize,
}

impl NullToken {
    pub fn new(symbol: &str) -> Self {
        Self {
            ledger: TokenLedger::new(symbol),
            failing: false,
            transfers: 0,
        }
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut TokenLedger {
        &mut self.ledger
    }

    /// While `true`, every transfer fails with [`TokenError::Rejected`].
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Number of transfers that went through.
    pub fn transfer_count(&self) -> usize {
        self.transfers
    }

    fn check(&self) -> Result<(), TokenError> {
        if self.failing {
            return Err(TokenError::Rejected("null token set to fail".to_string()));
        }
        Ok(())
    }
}

impl FungibleAsset for NullToken {
    fn balance_of(&self, account: &AccountId) -> u128 {
        self.ledger.balance_of(account)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.check()?;
        self.ledger.transfer(from, to, amount)?;
        self.transfers += 1;
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.check()?;
        self.ledger.transfer_from(spender, from, to, amount)?;
        self.transfers += 1;
        Ok(())
    }
}
