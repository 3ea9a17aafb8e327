//! Cooperative cancellation.
//!
//! The render pipeline is synchronous and single-threaded, so cancellation
//! doesn't need a full async primitive — just a flag the caller can flip
//! from another thread (or a signal handler) and that the driver checks at
//! step boundaries and between files in a walk/copy.

use crate::core::RenderError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns [`RenderError::Canceled`] if this token has fired.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check(&self) -> Result<(), RenderError> {
        if self.is_canceled() {
            Err(RenderError::Canceled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_cancel() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());
        token.cancel();
        assert!(matches!(token.check(), Err(RenderError::Canceled)));
    }

    #[test]
    fn clone_shares_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_canceled());
    }
}
