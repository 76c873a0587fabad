//! Rate limiting for remote calls
//!
//! Two classes of calls are budgeted independently: every GitHub API call
//! takes a token from the `api` limiter, and PR creation additionally takes
//! one from the stricter `push` limiter first.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// A source of permits for outbound calls
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until a token is available and consume it
    async fn acquire(&self);
}

/// Emits one token per fixed period
///
/// The first token becomes available one period after construction. Ticks
/// missed while nobody is waiting are not accumulated, so at most one token
/// is ever banked.
pub struct IntervalLimiter {
    ticker: Mutex<Interval>,
}

impl IntervalLimiter {
    /// Create a limiter emitting one token every `period`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticker: Mutex::new(ticker),
        }
    }
}

#[async_trait]
impl RateLimiter for IntervalLimiter {
    async fn acquire(&self) {
        self.ticker.lock().await.tick().await;
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn acquire(&self) {}
}

/// The two limiter classes shared by every publish in a process
#[derive(Clone)]
pub struct RateLimits {
    /// Consumed before every API call
    pub api: Arc<dyn RateLimiter>,
    /// Consumed once before each PR creation attempt
    pub push: Arc<dyn RateLimiter>,
}

impl RateLimits {
    /// Ticker-backed limits with the given periods
    pub fn with_intervals(api: Duration, push: Duration) -> Self {
        Self {
            api: Arc::new(IntervalLimiter::new(api)),
            push: Arc::new(IntervalLimiter::new(push)),
        }
    }

    /// Limits that never block
    pub fn unlimited() -> Self {
        Self {
            api: Arc::new(Unlimited),
            push: Arc::new(Unlimited),
        }
    }
}

impl std::fmt::Debug for RateLimits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimits").finish_non_exhaustive()
    }
}
