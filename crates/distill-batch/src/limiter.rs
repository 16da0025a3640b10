//! Sliding-window request rate limiter

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Trailing window the request ceiling applies to: 60 seconds plus a
/// 1-second margin absorbing clock and network jitter.
pub const WINDOW: Duration = Duration::from_secs(61);

/// Granularity waits are rounded up to
const TICK: Duration = Duration::from_millis(100);

/// Enforces a ceiling of `max_rpm` completed requests per trailing
/// [`WINDOW`].
///
/// Keeps a log of completion timestamps, capped at the most recent
/// `max_rpm` entries since older ones can never gate a wait. A sliding
/// window of N (rather than a fixed per-minute bucket) guarantees the true
/// rate never exceeds `max_rpm` in any 60-second interval, including
/// intervals straddling a bucket boundary.
#[derive(Debug)]
pub struct RateLimiter {
    max_rpm: usize,
    log: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a limiter permitting `max_rpm` requests per window.
    ///
    /// `max_rpm == 0` disables throttling entirely.
    pub fn new(max_rpm: usize) -> Self {
        Self {
            max_rpm,
            log: VecDeque::with_capacity(max_rpm),
        }
    }

    /// Block until the window admits the next request.
    ///
    /// If the log already holds `max_rpm` completions, sleeps out the
    /// remainder of the window measured from the completion exactly
    /// `max_rpm` positions back, rounded up to the nearest 0.1-second tick.
    /// Progress is reported in 1-second increments plus a final sub-second
    /// remainder.
    pub async fn throttle(&self) {
        if self.max_rpm == 0 || self.log.len() < self.max_rpm {
            return;
        }

        let gate = self.log[self.log.len() - self.max_rpm];
        let elapsed = gate.elapsed();
        if elapsed >= WINDOW {
            return;
        }

        let remaining = WINDOW - elapsed;
        let ticks = (remaining.as_millis() as u64).div_ceil(TICK.as_millis() as u64);
        info!("rate limit reached, waiting {:.1}s", ticks as f64 / 10.0);

        let whole_seconds = ticks / 10;
        let remainder_ticks = ticks % 10;
        if remainder_ticks > 0 {
            sleep(TICK * remainder_ticks as u32).await;
        }
        for second in 1..=whole_seconds {
            sleep(Duration::from_secs(1)).await;
            debug!("waited {second}/{whole_seconds}s");
        }
    }

    /// Record a completed request.
    ///
    /// Called after the gated request finishes; entries beyond the newest
    /// `max_rpm` are discarded.
    pub fn record(&mut self) {
        if self.max_rpm == 0 {
            return;
        }
        self.log.push_back(Instant::now());
        while self.log.len() > self.max_rpm {
            self.log.pop_front();
        }
    }
}
