//! Minimum-interval limiter for outbound geocoding calls.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Nominatim's usage policy allows one request per second.
pub const NOMINATIM_MIN_INTERVAL: Duration = Duration::from_millis(1100);

/// Spaces successive `acquire` calls at least `min_interval` apart.
///
/// The lock is held across the read, the wait and the timestamp write, so
/// concurrent callers queue up (tokio's mutex is FIFO) and each one measures
/// from the previous caller's grant rather than from a stale timestamp.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn nominatim() -> Self {
        Self::new(NOMINATIM_MIN_INTERVAL)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the next slot and claim it.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("rate limiter waiting {}ms", wait.as_millis());
                sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}
