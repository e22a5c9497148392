//! Provider Rate Limiter
//!
//! Fixed-interval limiter with an optional per-minute cap. One instance is
//! shared by every request that draws from the same provider budget.
//! Time and sleeping go through the `Clock` and `Sleeper` ports, so tests
//! run without real delays.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::ports::{Clock, Sleeper};

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct LimiterState {
    last_request: Option<DateTime<Utc>>,
    window_start: Option<DateTime<Utc>>,
    requests_in_window: u32,
}

/// Rate limiter for one provider budget
pub struct RateLimiter {
    name: String,
    min_interval: Duration,
    rpm_limit: Option<u32>,
    state: Mutex<LimiterState>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("name", &self.name)
            .field("min_interval", &self.min_interval)
            .field("rpm_limit", &self.rpm_limit)
            .finish()
    }
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    (to - from).to_std().unwrap_or(Duration::ZERO)
}

impl RateLimiter {
    /// Create a limiter enforcing `min_interval` between request starts
    pub fn new(
        name: impl Into<String>,
        min_interval: Duration,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            name: name.into(),
            min_interval,
            rpm_limit: None,
            state: Mutex::new(LimiterState::default()),
            clock,
            sleeper,
        }
    }

    /// Additionally cap requests per rolling minute
    pub fn with_rpm_limit(mut self, rpm: u32) -> Self {
        self.rpm_limit = Some(rpm).filter(|r| *r > 0);
        self
    }

    /// How long a request made at `now` would have to wait
    fn wait_time(&self, state: &mut LimiterState, now: DateTime<Utc>) -> Option<Duration> {
        if let (Some(limit), Some(start)) = (self.rpm_limit, state.window_start) {
            let in_window = elapsed(start, now);
            if in_window >= WINDOW {
                state.window_start = Some(now);
                state.requests_in_window = 0;
            } else if state.requests_in_window >= limit {
                return Some(WINDOW - in_window);
            }
        }

        let last = state.last_request?;
        let since_last = elapsed(last, now);
        (since_last < self.min_interval).then(|| self.min_interval - since_last)
    }

    fn record_request(&self, state: &mut LimiterState, now: DateTime<Utc>) {
        state.last_request = Some(now);
        if state.window_start.is_none() {
            state.window_start = Some(now);
        }
        state.requests_in_window += 1;
    }

    /// Wait until a request may start, then claim the slot.
    ///
    /// The lock is held across the wait so concurrent callers queue up
    /// instead of all waking at once.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        loop {
            let now = self.clock.now();
            match self.wait_time(&mut state, now) {
                Some(wait) if !wait.is_zero() => {
                    tracing::debug!("{} rate limit: waiting {:?}", self.name, wait);
                    self.sleeper.sleep(wait).await;
                }
                _ => break,
            }
        }
        let now = self.clock.now();
        self.record_request(&mut state, now);
    }
}
