//! Fungible assets.
//!
//! The staking pool and vesting vault only ever talk to tokens through the
//! [`FungibleAsset`] trait. [`TokenLedger`] is the in-memory implementation used
//! by deployments and tests.

pub mod asset;
pub mod error;
pub mod ledger;

pub use asset::FungibleAsset;
pub use error::TokenError;
pub use ledger::TokenLedger;
