//! Snapshot Cache
//!
//! Single process-wide snapshot with a TTL. A refresh replaces the whole
//! value atomically; concurrent cold-cache callers may each compute, and
//! whichever finishes last is kept.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::Token;
use crate::ports::Clock;

/// Default time a snapshot stays fresh
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(300);

/// Sorted pipeline output plus the time it was computed
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tokens: Vec<Token>,
    pub computed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.computed_at).to_std().unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    slot: RwLock<Option<Arc<Snapshot>>>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_TTL)
    }
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: RwLock::new(None) }
    }

    fn is_fresh(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> bool {
        now >= snapshot.computed_at && snapshot.age(now) < self.ttl
    }

    /// Current snapshot if still fresh at `now`
    pub async fn get(&self, now: DateTime<Utc>) -> Option<Arc<Snapshot>> {
        let slot = self.slot.read().await;
        slot.as_ref().filter(|s| self.is_fresh(s, now)).cloned()
    }

    /// Return the snapshot fresh at `clock.now()`, or run `compute`
    ///
    /// A new snapshot is stamped with the clock reading taken after `compute`
    /// finishes, so its full TTL starts once the data is complete. A failed
    /// compute leaves the previous value in place.
    pub async fn get_or_compute<F, Fut, E>(&self, clock: &dyn Clock, compute: F) -> Result<Arc<Snapshot>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Token>, E>>,
    {
        if let Some(snapshot) = self.get(clock.now()).await {
            tracing::debug!("Serving cached snapshot ({} tokens)", snapshot.tokens.len());
            return Ok(snapshot);
        }

        // lock is not held while computing
        let tokens = compute().await?;
        let snapshot = Arc::new(Snapshot { tokens, computed_at: clock.now() });
        *self.slot.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}
