//! Access control for the stakevest shells.
//!
//! The reward and vesting engines never check identities themselves. The
//! shells wrapping them consult an [`AccessGate`] before privileged calls and
//! hold a [`ReentrancyGuard`] across every mutate-then-transfer section.

pub mod error;
pub mod gate;
pub mod guard;

pub use error::AccessError;
pub use gate::AccessGate;
pub use guard::ReentrancyGuard;
