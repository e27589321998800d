//! Reward-specific errors.

use stakevest_access::AccessError;
use stakevest_token::TokenError;
use stakevest_types::MathError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("cannot stake zero")]
    ZeroAmount,

    #[error("insufficient stake: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u128, staked: u128 },

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("token transfer failed: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Access(#[from] AccessError),
}
