//! Cooperative cancellation for collection runs.
//!
//! A [`ShutdownSignal`] is cloned into the rate limiter and every collector.
//! Once requested, the limiter stops waiting and each per-item loop returns
//! [`Cancelled`] at its next iteration boundary, leaving the in-memory batch
//! untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Returned when work stops because shutdown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("shutdown requested")]
pub struct Cancelled;

#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Wakes all current waiters exactly once.
    pub fn request(&self) {
        if !self.inner.requested.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    /// # Errors
    ///
    /// Returns [`Cancelled`] once [`Self::request`] has been called.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_requested() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once shutdown is requested; immediately if it already was.
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before re-checking the flag so a concurrent `request`
        // cannot slip between the check and the await.
        notified.as_mut().enable();
        if self.is_requested() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn check_fails_after_request() {
        let signal = ShutdownSignal::new();
        assert!(signal.check().is_ok());
        signal.clone().request();
        assert_eq!(signal.check(), Err(Cancelled));
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_requested() {
        let signal = ShutdownSignal::new();
        signal.request();
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("cancelled() should resolve immediately");
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };
        tokio::task::yield_now().await;
        signal.request();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter task should not panic");
    }
}
