//! Graduated Token Pipeline
//!
//! aggregate -> deduplicate -> enrich -> sort by market cap (descending)

use std::time::Instant;

use async_trait::async_trait;

use super::aggregator::Aggregator;
use super::enricher::Enricher;
use crate::domain::{deduplicate, sort_by_market_cap_desc, Token};
use crate::ports::{PipelineError, TokenPipeline};

pub struct GraduatedPipeline {
    aggregator: Aggregator,
    enricher: Enricher,
}

impl GraduatedPipeline {
    pub fn new(aggregator: Aggregator, enricher: Enricher) -> Self {
        Self { aggregator, enricher }
    }
}

#[async_trait]
impl TokenPipeline for GraduatedPipeline {
    async fn run(&self) -> Result<Vec<Token>, PipelineError> {
        let started = Instant::now();

        let raw = self.aggregator.aggregate().await?;
        let raw_count = raw.len();

        let unique = deduplicate(raw);
        tracing::info!("Deduplicated {} candidates into {} tokens", raw_count, unique.len());

        let mut tokens = self.enricher.enrich(unique).await;
        sort_by_market_cap_desc(&mut tokens);

        tracing::info!("Pipeline finished: {} tokens in {:?}", tokens.len(), started.elapsed());
        Ok(tokens)
    }
}
