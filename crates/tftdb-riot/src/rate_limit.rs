//! Dual-window rate limiting for all outbound Riot API calls.
//!
//! Two rules are enforced on every [`RateLimiter::acquire`]:
//!
//! - **Burst:** consecutive acquisitions complete at least
//!   [`RateLimitPolicy::min_spacing`] apart (20 calls/second ⇒ 50 ms).
//! - **Sustained:** after [`RateLimitPolicy::window_threshold`] calls the
//!   limiter pauses for [`RateLimitPolicy::cooldown`] and resets its counter.
//!   The defaults (95 calls, 130 s) stay under the 100 calls / 120 s key limit.
//!
//! The limiter state sits behind an async mutex that is held across the
//! wait, so concurrent callers are serialized and can never both observe
//! "under threshold" at the cooldown boundary.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::clock::{Clock, TokioClock};
use crate::shutdown::{Cancelled, ShutdownSignal};

const DEFAULT_MIN_SPACING: Duration = Duration::from_millis(50);
const DEFAULT_WINDOW_THRESHOLD: u32 = 95;
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(130);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub min_spacing: Duration,
    pub window_threshold: u32,
    pub cooldown: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_spacing: DEFAULT_MIN_SPACING,
            window_threshold: DEFAULT_WINDOW_THRESHOLD,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl RateLimitPolicy {
    /// No spacing and no cooldown. For tests against a mock server.
    #[must_use]
    pub fn unthrottled() -> Self {
        Self {
            min_spacing: Duration::ZERO,
            window_threshold: u32::MAX,
            cooldown: Duration::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct LimiterState {
    last_call: Option<Instant>,
    calls_in_window: u32,
}

pub struct RateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    state: Mutex<LimiterState>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Creates a limiter driven by the Tokio clock.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_clock(policy, Arc::new(TokioClock))
    }

    #[must_use]
    pub fn with_clock(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            shutdown: ShutdownSignal::new(),
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Makes pending and future waits return [`Cancelled`] once `shutdown`
    /// is requested.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Calls recorded since the last cooldown.
    pub async fn calls_in_window(&self) -> u32 {
        self.state.lock().await.calls_in_window
    }

    /// Waits until one more outbound call is allowed, then records it.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if shutdown is requested before or while waiting.
    /// The call is not recorded in that case.
    pub async fn acquire(&self) -> Result<(), Cancelled> {
        self.shutdown.check()?;
        let mut state = self.state.lock().await;

        if state.calls_in_window >= self.policy.window_threshold {
            tracing::info!(
                calls = state.calls_in_window,
                cooldown_secs = self.policy.cooldown.as_secs(),
                "rate limit window exhausted, cooling down"
            );
            self.pause(self.policy.cooldown).await?;
            state.calls_in_window = 0;
        }

        if let Some(last) = state.last_call {
            let since = self.clock.now().saturating_duration_since(last);
            if since < self.policy.min_spacing {
                let wait = self.policy.min_spacing - since;
                tracing::debug!(wait = ?wait, "spacing outbound call");
                self.pause(wait).await?;
            }
        }

        state.last_call = Some(self.clock.now());
        state.calls_in_window += 1;
        Ok(())
    }

    async fn pause(&self, duration: Duration) -> Result<(), Cancelled> {
        tokio::select! {
            () = self.clock.sleep(duration) => Ok(()),
            () = self.shutdown.cancelled() => Err(Cancelled),
        }
    }
}
