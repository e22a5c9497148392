//! Fetch Orchestrator
//!
//! Runs every provider domain as its own task so a slow or hung domain
//! only stalls itself, then concatenates whatever each produced.

use std::sync::Arc;

use crate::domain::{SourceHarvest, Token};
use crate::ports::{PipelineError, TokenSource};

/// Concurrent fan-out over provider domains
pub struct Aggregator {
    sources: Vec<Arc<dyn TokenSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn TokenSource>>) -> Self {
        Self { sources }
    }

    /// Fetch from all domains concurrently; order of the result is unspecified
    ///
    /// Fails only when every domain task died (a panic escaping per-unit
    /// recovery). A single dead domain is logged and contributes nothing.
    pub async fn aggregate(&self) -> Result<Vec<Token>, PipelineError> {
        if self.sources.is_empty() {
            return Ok(Vec::new());
        }

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let name = source.name().to_string();
                (name, tokio::spawn(async move { source.fetch_all().await }))
            })
            .collect();

        let mut combined = SourceHarvest::default();
        let mut failures = Vec::new();

        for (name, handle) in handles {
            match handle.await {
                Ok(harvest) => {
                    let skipped = harvest.skipped().count();
                    tracing::info!(
                        "{}: {} tokens from {} units ({} skipped)",
                        name,
                        harvest.tokens.len(),
                        harvest.reports.len(),
                        skipped
                    );
                    combined.absorb(harvest);
                }
                Err(e) => {
                    tracing::error!("{} fetch task failed: {}", name, e);
                    failures.push(format!("{}: {}", name, e));
                }
            }
        }

        if failures.len() == self.sources.len() {
            return Err(PipelineError::AllSourcesFailed(failures.join("; ")));
        }

        Ok(combined.tokens)
    }
}
