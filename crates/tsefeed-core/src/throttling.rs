use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Enforces a minimum delay between consecutive outbound requests.
///
/// Backed by a single-cell GCRA limiter, so idle time never builds up a burst.
/// Clones share the same limiter.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Option<Arc<DirectRateLimiter>>,
    delay: Duration,
}

impl RequestPacer {
    /// A zero delay disables pacing.
    pub fn new(delay: Duration) -> Self {
        let limiter = Quota::with_period(delay).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub const fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Waits until the next request may be sent.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("delay", &self.delay)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn zero_delay_disables_pacing() {
        assert!(!RequestPacer::new(Duration::ZERO).is_enabled());
        assert!(RequestPacer::new(Duration::from_millis(300)).is_enabled());
    }

    #[tokio::test]
    async fn consecutive_requests_are_spaced() {
        let pacer = RequestPacer::new(Duration::from_millis(60));
        let started = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(110));
    }

    #[tokio::test]
    async fn first_request_is_not_delayed() {
        let pacer = RequestPacer::new(Duration::from_secs(5));
        let started = Instant::now();
        pacer.wait().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
