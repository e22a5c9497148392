//! In-memory port doubles for deterministic tests
//!
//! `MockHttpGateway` answers GETs from a scripted URL table and records
//! every call. `ManualClock` is both a `Clock` and a `Sleeper`: sleeping
//! advances the clock instead of waiting. `RendezvousGateway` holds two
//! groups of requests until both have started, so it only completes when
//! they run concurrently.
//!
//! Compiled for unit tests and behind the `test-util` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::{Clock, FetchError, HttpGateway, HttpResponse, Sleeper};

/// Scripted reply for one URL
#[derive(Debug, Clone)]
enum MockReply {
    Response(HttpResponse),
    Error(FetchError),
}

/// Mock HTTP gateway that records calls and allows controlled responses
#[derive(Debug, Default, Clone)]
pub struct MockHttpGateway {
    calls: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
}

impl MockHttpGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to answer `url` with a 200 and `body`
    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with_status(url, 200, body)
    }

    /// Builder method to answer `url` with an arbitrary status
    pub fn with_status(self, url: &str, status: u16, body: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), MockReply::Response(HttpResponse::new(status, body)));
        self
    }

    /// Builder method to fail `url` at the transport level
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.replies.lock().unwrap().insert(url.to_string(), MockReply::Error(error));
        self
    }

    /// All recorded calls, in order
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose URL contains `fragment`
    pub fn count_calls(&self, fragment: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.contains(fragment)).count()
    }
}

#[async_trait]
impl HttpGateway for MockHttpGateway {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.replies.lock().unwrap().get(url).cloned() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(error)) => Err(error),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

/// Gateway that blocks each of two URL groups until the other has been requested
///
/// A request whose URL contains `left` marks the left group as started and
/// then waits for the right group, and the other way round. Callers that
/// issue the two groups one after the other never get past the first
/// request, which tests catch with a timeout.
#[derive(Debug, Clone)]
pub struct RendezvousGateway {
    inner: MockHttpGateway,
    left: String,
    right: String,
    left_started: Arc<watch::Sender<bool>>,
    right_started: Arc<watch::Sender<bool>>,
}

impl RendezvousGateway {
    pub fn new(inner: MockHttpGateway, left: &str, right: &str) -> Self {
        Self {
            inner,
            left: left.to_string(),
            right: right.to_string(),
            left_started: Arc::new(watch::channel(false).0),
            right_started: Arc::new(watch::channel(false).0),
        }
    }

    async fn meet(arrived: &watch::Sender<bool>, other: &watch::Sender<bool>) {
        arrived.send_replace(true);
        let mut other = other.subscribe();
        // the sender lives in `self`, so the channel never closes here
        let _ = other.wait_for(|started| *started).await;
    }
}

#[async_trait]
impl HttpGateway for RendezvousGateway {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        if url.contains(&self.left) {
            Self::meet(&self.left_started, &self.right_started).await;
        } else if url.contains(&self.right) {
            Self::meet(&self.right_started, &self.left_started).await;
        }
        self.inner.get(url).await
    }
}

/// Settable clock whose sleeps advance time instantly
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Move time forward without recording a sleep
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }

    /// Every sleep requested so far
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[async_trait]
impl Sleeper for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
    }
}
