//! GeckoTerminal Pool Source
//!
//! Walks several paginated pool listings one page at a time. All query
//! modes share a single rate limiter because the provider enforces one
//! per-minute quota across them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::types::GeckoPoolResponse;
use crate::adapters::http::fetch_json;
use crate::adapters::rate_limit::RateLimiter;
use crate::domain::{select_graduated, GraduationRules, SkipReason, SourceHarvest, UnitOutcome, UnitReport};
use crate::ports::{Clock, HttpGateway, Sleeper, TokenSource};

/// GeckoTerminal API base URL
pub const GECKOTERMINAL_API_BASE: &str = "https://api.geckoterminal.com/api/v2";

/// Source configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeckoTerminalConfig {
    pub api_base_url: String,
    /// Network slug used in URLs
    pub network: String,
    pub trending_pages: u32,
    /// DEX slugs with their own listing
    pub dexes: Vec<String>,
    pub dex_pages: u32,
    pub new_pool_pages: u32,
    /// Gap between consecutive page requests
    pub request_interval: Duration,
    /// Optional hard per-minute cap
    pub requests_per_minute: Option<u32>,
}

impl Default for GeckoTerminalConfig {
    fn default() -> Self {
        Self {
            api_base_url: GECKOTERMINAL_API_BASE.to_string(),
            network: "solana".to_string(),
            trending_pages: 10,
            dexes: vec!["raydium".to_string(), "raydium-clmm".to_string()],
            dex_pages: 5,
            new_pool_pages: 10,
            request_interval: Duration::from_millis(250),
            requests_per_minute: None,
        }
    }
}

/// One paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    Trending,
    Dex(String),
    NewPools,
}

impl QueryMode {
    pub fn label(&self) -> String {
        match self {
            QueryMode::Trending => "trending".to_string(),
            QueryMode::Dex(dex) => format!("dex:{}", dex),
            QueryMode::NewPools => "new_pools".to_string(),
        }
    }

    fn url(&self, config: &GeckoTerminalConfig, page: u32) -> String {
        let base = format!("{}/networks/{}", config.api_base_url, config.network);
        match self {
            QueryMode::Trending => format!("{}/trending_pools?page={}", base, page),
            QueryMode::Dex(dex) => {
                format!("{}/dexes/{}/pools?page={}&sort=h24_volume_usd_desc", base, dex, page)
            }
            QueryMode::NewPools => format!("{}/new_pools?page={}", base, page),
        }
    }

    fn max_pages(&self, config: &GeckoTerminalConfig) -> u32 {
        match self {
            QueryMode::Trending => config.trending_pages,
            QueryMode::Dex(_) => config.dex_pages,
            QueryMode::NewPools => config.new_pool_pages,
        }
    }
}

/// Comprehensive pool index source
pub struct GeckoTerminalSource {
    config: GeckoTerminalConfig,
    rules: GraduationRules,
    gateway: Arc<dyn HttpGateway>,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl GeckoTerminalSource {
    pub fn new(
        config: GeckoTerminalConfig,
        rules: GraduationRules,
        gateway: Arc<dyn HttpGateway>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let mut limiter = RateLimiter::new("geckoterminal", config.request_interval, clock.clone(), sleeper);
        if let Some(rpm) = config.requests_per_minute {
            limiter = limiter.with_rpm_limit(rpm);
        }

        Self { config, rules, gateway, limiter, clock }
    }

    /// Modes in the order they run: trending first, then per-DEX, then newest
    pub fn modes(&self) -> Vec<QueryMode> {
        let mut modes = vec![QueryMode::Trending];
        modes.extend(self.config.dexes.iter().cloned().map(QueryMode::Dex));
        modes.push(QueryMode::NewPools);
        modes
    }

    /// Page through one mode until it is exhausted, fails, or hits its cap
    pub async fn fetch_mode(&self, mode: &QueryMode) -> SourceHarvest {
        let mut harvest = SourceHarvest::default();
        let label = mode.label();

        for page in 1..=mode.max_pages(&self.config) {
            self.limiter.acquire().await;

            let unit = format!("geckoterminal {} p{}", label, page);
            let url = mode.url(&self.config, page);

            match fetch_json::<GeckoPoolResponse>(self.gateway.as_ref(), &url).await {
                UnitOutcome::Ok(response) if response.data.is_empty() => {
                    harvest.reports.push(UnitReport::skipped(unit, SkipReason::Empty));
                    break;
                }
                UnitOutcome::Ok(response) => {
                    let graduated = select_graduated(&response.data, &self.rules, self.clock.now());
                    harvest.reports.push(UnitReport::ok(unit, graduated.len()));
                    harvest.tokens.extend(graduated);
                }
                UnitOutcome::Skipped(reason) => {
                    harvest.reports.push(UnitReport::skipped(unit, reason));
                    break;
                }
            }
        }

        tracing::info!("GeckoTerminal {}: {} graduated tokens", label, harvest.tokens.len());
        harvest
    }
}

#[async_trait]
impl TokenSource for GeckoTerminalSource {
    fn name(&self) -> &str {
        "geckoterminal"
    }

    /// Run every mode back to back against the shared budget
    async fn fetch_all(&self) -> SourceHarvest {
        let mut harvest = SourceHarvest::default();
        for mode in self.modes() {
            harvest.absorb(self.fetch_mode(&mode).await);
        }
        tracing::info!("GeckoTerminal total: {} tokens", harvest.tokens.len());
        harvest
    }
}
