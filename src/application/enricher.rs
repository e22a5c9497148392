//! Metadata Enricher
//!
//! Best-effort second pass that fills in missing images (and better names)
//! from batched address lookups. Never drops, reorders or fails tokens.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::rate_limit::RateLimiter;
use crate::domain::{Token, UnitOutcome};
use crate::ports::{Clock, MetadataLookup, Sleeper};

/// Enrichment tunables
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentConfig {
    /// Most tokens looked up per run
    pub max_candidates: usize,
    /// Addresses per lookup request
    pub batch_size: usize,
    pub batch_interval: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_candidates: 150,
            batch_size: 30,
            batch_interval: Duration::from_millis(200),
        }
    }
}

pub struct Enricher {
    config: EnrichmentConfig,
    lookup: Arc<dyn MetadataLookup>,
    limiter: RateLimiter,
}

impl Enricher {
    pub fn new(
        config: EnrichmentConfig,
        lookup: Arc<dyn MetadataLookup>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let limiter = RateLimiter::new("enrichment", config.batch_interval, clock, sleeper);
        Self { config, lookup, limiter }
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size.min(self.lookup.max_batch()).max(1)
    }

    /// Fill `image_url` (and `name`) for up to `max_candidates` tokens lacking an image
    pub async fn enrich(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        let candidates: Vec<String> = tokens
            .iter()
            .filter(|t| t.needs_image())
            .take(self.config.max_candidates)
            .map(|t| t.address.clone())
            .collect();

        if candidates.is_empty() {
            return tokens;
        }

        let index: HashMap<String, usize> = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.address.clone(), i))
            .collect();

        let mut enriched = 0usize;
        for batch in candidates.chunks(self.batch_size()) {
            self.limiter.acquire().await;

            let found = match self.lookup.lookup(batch).await {
                UnitOutcome::Ok(found) => found,
                UnitOutcome::Skipped(reason) => {
                    tracing::warn!("Enrichment batch of {} skipped: {}", batch.len(), reason);
                    continue;
                }
            };

            // later matches for the same address overwrite earlier ones
            for meta in found {
                let Some(image_url) = meta.image_url else { continue };
                let Some(&i) = index.get(&meta.address) else { continue };

                let token = &mut tokens[i];
                if token.image_url.is_none() {
                    enriched += 1;
                }
                token.image_url = Some(image_url);
                if let Some(name) = meta.name.filter(|n| !n.is_empty()) {
                    token.name = name;
                }
            }
        }

        tracing::info!("Enriched {} of {} candidates", enriched, candidates.len());
        tokens
    }
}
