use stakevest_types::AccountId;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("caller {0} is not the controller")]
    Unauthorized(AccountId),

    #[error("operations are paused")]
    Paused,

    #[error("already paused")]
    AlreadyPaused,

    #[error("not paused")]
    NotPaused,

    #[error("controller cannot be the zero account")]
    ZeroController,

    #[error("reentrant call rejected")]
    Reentrant,
}
