//! Token vesting: cliff-then-linear release of a pre-committed allocation.
//!
//! A beneficiary's [`VestingSchedule`] releases nothing before its cliff,
//! `unlock_amount` at the cliff, and the remainder linearly until `end_time`:
//!
//! `vested(t) = min(unlock + (total − unlock) × (t − cliff) / (end − cliff), total)`
//!
//! The [`VestingLedger`] keeps every schedule and bounds their sum by the
//! vault's holdings. The [`VestingVault`] adds the controller gate and moves
//! tokens.

pub mod error;
pub mod event;
pub mod ledger;
pub mod schedule;
pub mod vault;

pub use error::VestingError;
pub use event::VaultEvent;
pub use ledger::{LedgerSnapshot, VestingLedger};
pub use schedule::VestingSchedule;
pub use vault::VestingVault;
