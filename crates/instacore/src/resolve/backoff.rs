//! Rate-limit backoff shared by every fetch of one resolve call.
//!
//! An HTTP 429 on any source arms the gate; the next request, whatever
//! profile or source it belongs to, waits a fixed backoff first.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

pub struct RateLimitGate {
    backoff: Duration,
    armed: AtomicBool,
    hits: AtomicU32,
}

impl RateLimitGate {
    pub fn new(backoff: Duration) -> Self {
        Self {
            backoff,
            armed: AtomicBool::new(false),
            hits: AtomicU32::new(0),
        }
    }

    /// Records a 429; the next `wait` call sleeps.
    pub fn note_rate_limited(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.armed.store(true, Ordering::Relaxed);
    }

    /// Sleeps the backoff if a 429 was seen since the last wait. Never sleeps
    /// past `deadline`.
    pub async fn wait(&self, deadline: Option<Instant>) {
        if !self.armed.swap(false, Ordering::Relaxed) {
            return;
        }

        let delay = match deadline {
            Some(deadline) => self.backoff.min(deadline.saturating_duration_since(Instant::now())),
            None => self.backoff,
        };

        log::info!("Rate limited earlier in this call, backing off for {:?}", delay);
        tokio::time::sleep(delay).await;
    }

    /// Number of 429s seen in this call.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }
}
