//! In-memory token ledger with allowances.

use std::collections::HashMap;

use crate::asset::FungibleAsset;
use crate::error::TokenError;
use stakevest_types::math::{checked_add, checked_sub};
use stakevest_types::AccountId;
use tracing::trace;

/// Balances and allowances for one asset, keyed by account.
#[derive(Clone, Debug, Default)]
pub struct TokenLedger {
    symbol: String,
    balances: HashMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    total_supply: u128,
}

impl TokenLedger {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Create `amount` new units in `to`.
    pub fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        let supply = checked_add(self.total_supply, amount)?;
        let balance = checked_add(self.balance_of(to), amount)?;
        self.total_supply = supply;
        self.balances.insert(*to, balance);
        trace!(token = %self.symbol, %to, amount, "mint");
        Ok(())
    }

    /// Set the amount `spender` may move out of `owner` (replaces any previous allowance).
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: *from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = checked_add(self.balance_of(to), amount)?;
        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);
        trace!(token = %self.symbol, %from, %to, amount, "transfer");
        Ok(())
    }
}

impl FungibleAsset for TokenLedger {
    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                needed: amount,
                available: allowed,
            });
        }
        self.move_balance(from, to, amount)?;
        let remaining = checked_sub(allowed, amount)?;
        self.approve(from, spender, remaining);
        Ok(())
    }
}
