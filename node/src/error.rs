use stakevest_access::AccessError;
use stakevest_rewards::RewardError;
use stakevest_token::TokenError;
use stakevest_vesting::VestingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("access error: {0}")]
    Access(#[from] AccessError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("staking pool error: {0}")]
    Reward(#[from] RewardError),

    #[error("vesting vault error: {0}")]
    Vesting(#[from] VestingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
