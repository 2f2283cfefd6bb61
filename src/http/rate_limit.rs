//! Rate limiting implementation
//!
//! Uses the governor crate. The quota admits one request per configured
//! delay with a burst of one, so consecutive outbound requests are spaced
//! at least `delay` apart across every caller sharing the limiter.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Default spacing between outbound requests
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Configuration for rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Minimum time between two outbound requests
    pub delay: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

impl RateLimiterConfig {
    /// Config for a delay; `None` when the delay is zero (limiting disabled)
    pub fn from_delay(delay: Duration) -> Option<Self> {
        if delay.is_zero() {
            None
        } else {
            Some(Self { delay })
        }
    }
}

/// Request spacing limiter, cheap to clone and shared across tasks
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    delay: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let quota = Quota::with_period(config.delay)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::MIN);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
            delay: config.delay,
        }
    }

    /// Configured spacing
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next request may go out
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("delay", &self.delay)
            .finish()
    }
}
