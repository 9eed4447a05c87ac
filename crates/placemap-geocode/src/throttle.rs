use std::time::Duration;

use tokio::time::Instant;

/// Spaces out external calls so consecutive call starts are at least
/// `min_interval` apart. Only calls that go through `wait` count.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Sleep out whatever is left of the interval, then record now as the
    /// start of the next call. The first call never waits.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let ready_at = last + self.min_interval;
            if Instant::now() < ready_at {
                tracing::trace!("Rate limiting for {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
