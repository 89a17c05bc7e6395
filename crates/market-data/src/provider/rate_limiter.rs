//! Token bucket pacing for outgoing provider requests.
//!
//! One limiter guards one provider. Tokens refill continuously at
//! `requests_per_minute / 60` per second up to `burst`, and two consecutive
//! requests are never closer than `min_delay`.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::capabilities::RateLimit;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    capacity: f64,
    /// Tokens per second.
    rate: f64,
    last_refill: Instant,
    last_grant: Option<Instant>,
}

impl Bucket {
    fn new(limit: &RateLimit) -> Self {
        let capacity = f64::from(limit.burst.max(1));
        Self {
            tokens: capacity,
            capacity,
            rate: f64::from(limit.requests_per_minute.max(1)) / 60.0,
            last_refill: Instant::now(),
            last_grant: None,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Zero when a request may go out now, otherwise how long to wait.
    fn wait_time(&mut self, now: Instant, min_delay: Duration) -> Duration {
        self.refill(now);

        let spacing = self
            .last_grant
            .map(|t| min_delay.saturating_sub(now.duration_since(t)))
            .unwrap_or(Duration::ZERO);

        let refill_wait = if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        };

        spacing.max(refill_wait)
    }

    fn grant(&mut self, now: Instant) {
        self.tokens -= 1.0;
        self.last_grant = Some(now);
    }
}

/// Thread-safe rate limiter for a single provider.
pub struct RateLimiter {
    provider: &'static str,
    min_delay: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(provider: &'static str, limit: RateLimit) -> Self {
        Self {
            provider,
            min_delay: limit.min_delay,
            bucket: Mutex::new(Bucket::new(&limit)),
        }
    }

    /// Lock the bucket, recovering from poison. A poisoned bucket only
    /// means slightly wrong pacing.
    fn lock_bucket(&self) -> MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter for '{}' was poisoned, recovering", self.provider);
            poisoned.into_inner()
        })
    }

    /// Wait (asynchronously) until a request may be sent, then take a token.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.lock_bucket();
                let now = Instant::now();
                let wait = bucket.wait_time(now, self.min_delay);
                if wait.is_zero() {
                    bucket.grant(now);
                    return;
                }
                wait
            };

            debug!("Rate limiter: waiting {:?} for '{}'", wait, self.provider);
            tokio::time::sleep(wait).await;
        }
    }
}
