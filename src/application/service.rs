//! Snapshot Service
//!
//! Public entry point used by the HTTP endpoint and the CLI: returns the
//! cached snapshot or runs the pipeline once the cache has expired.

use std::sync::Arc;

use thiserror::Error;

use super::aggregator::Aggregator;
use super::cache::{Snapshot, SnapshotCache};
use super::enricher::{EnrichmentConfig, Enricher};
use super::pipeline::GraduatedPipeline;
use crate::adapters::dexscreener::{DexScreenerConfig, DexScreenerSource};
use crate::adapters::geckoterminal::{GeckoTerminalConfig, GeckoTerminalSource};
use crate::adapters::http::{HttpConfig, ReqwestGateway};
use crate::config::{Config, ConfigError};
use crate::ports::{
    Clock, FetchError, HttpGateway, PipelineError, Sleeper, SystemClock, TokenPipeline, TokenSource, TokioSleeper,
};

/// Failure building the production service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client: {0}")]
    Http(#[from] FetchError),
}

pub struct SnapshotService {
    cache: SnapshotCache,
    pipeline: Arc<dyn TokenPipeline>,
    clock: Arc<dyn Clock>,
}

impl SnapshotService {
    pub fn new(pipeline: Arc<dyn TokenPipeline>, cache: SnapshotCache, clock: Arc<dyn Clock>) -> Self {
        Self { cache, pipeline, clock }
    }

    /// Production wiring: reqwest, wall clock, tokio timer
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let gateway = Arc::new(ReqwestGateway::with_config(HttpConfig::from(config))?);
        Ok(Self::wire(config, gateway, Arc::new(SystemClock), Arc::new(TokioSleeper))?)
    }

    /// Build both provider domains, the enricher and the cache over the given ports
    pub fn wire(
        config: &Config,
        gateway: Arc<dyn HttpGateway>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, ConfigError> {
        let gecko = Arc::new(GeckoTerminalSource::new(
            GeckoTerminalConfig::from(config),
            config.gecko_rules()?,
            gateway.clone(),
            clock.clone(),
            sleeper.clone(),
        ));
        let dex = Arc::new(DexScreenerSource::new(
            DexScreenerConfig::from(config),
            config.dex_rules()?,
            gateway,
            clock.clone(),
            sleeper.clone(),
        ));

        let aggregator = Aggregator::new(vec![
            gecko as Arc<dyn TokenSource>,
            dex.clone() as Arc<dyn TokenSource>,
        ]);
        let enricher = Enricher::new(EnrichmentConfig::from(config), dex, clock.clone(), sleeper);
        let pipeline = Arc::new(GraduatedPipeline::new(aggregator, enricher));

        Ok(Self::new(pipeline, SnapshotCache::new(config.cache_ttl()), clock))
    }

    /// Fresh cached snapshot, or a new one computed now
    pub async fn get_snapshot(&self) -> Result<Arc<Snapshot>, PipelineError> {
        let result = self.cache.get_or_compute(self.clock.as_ref(), || self.pipeline.run()).await;
        if let Err(e) = &result {
            tracing::error!("Snapshot refresh failed: {}", e);
        }
        result
    }

    /// Current time on the service clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
