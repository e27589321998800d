//! Reentrancy lock held across external token movements.

use crate::error::AccessError;

/// A non-reentrant lock.
///
/// `enter` fails while a previous entry is still open. Shells open it before
/// updating bookkeeping and close it after the token transfer settles, on both
/// success and failure paths.
#[derive(Clone, Debug, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn enter(&mut self) -> Result<(), AccessError> {
        if self.is_entered() {
            return Err(AccessError::Reentrant);
        }
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.entered = false;
    }
}
