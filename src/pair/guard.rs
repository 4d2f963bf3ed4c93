//! Non-blocking reentrancy guard.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::AmmError;

/// RAII token proving the holder owns a pair's operation lock.
///
/// Acquisition never waits: if the lock is already held, whether by the
/// same call stack (a flash-swap callee re-entering) or by another thread,
/// [`enter`](Self::enter) fails with [`AmmError::Locked`].  The lock is
/// released when the guard drops, on both the success and the error path.
#[derive(Debug)]
pub(crate) struct ReentrancyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReentrancyGuard<'a> {
    pub(crate) fn enter(flag: &'a AtomicBool) -> Result<Self, AmmError> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| AmmError::Locked)?;
        Ok(Self { flag })
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
