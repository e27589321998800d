use stakevest_types::{AccountId, MathError};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("cannot transfer to the zero account")]
    ZeroRecipient,

    #[error("transfer rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Math(#[from] MathError),
}
