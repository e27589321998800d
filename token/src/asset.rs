//! The interface every token collaborator implements.

use crate::error::TokenError;
use stakevest_types::AccountId;

/// Balance transfer and balance-of queries for a single fungible asset.
///
/// A returned error means the transfer did not happen; callers treat it as a
/// failure of their whole operation and roll back.
pub trait FungibleAsset {
    fn balance_of(&self, account: &AccountId) -> u128;

    /// Move `amount` from `from` to `to`, debiting `from` directly.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError>;
}
