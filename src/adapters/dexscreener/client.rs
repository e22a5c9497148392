//! DexScreener Source
//!
//! Two query styles that run concurrently, each on its own limiter:
//! boosted tokens (list, then per-address lookups in small concurrent
//! batches) and a fixed list of keyword searches issued one at a time.
//! The same client also serves batched address lookups for enrichment.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Url;

use super::types::{DexBoost, DexPairsResponse};
use crate::adapters::http::fetch_json;
use crate::adapters::rate_limit::RateLimiter;
use crate::domain::{select_graduated, GraduationRules, SkipReason, SourceHarvest, UnitOutcome, UnitReport};
use crate::ports::{Clock, HttpGateway, MetadataLookup, Sleeper, TokenMetadata, TokenSource};

/// DexScreener API base URL
pub const DEXSCREENER_API_BASE: &str = "https://api.dexscreener.com";

/// Most addresses `/latest/dex/tokens/` accepts per request
pub const MAX_ADDRESSES_PER_LOOKUP: usize = 30;

/// Keyword queries that tend to surface launchpad tokens
pub const DEFAULT_SEARCH_TERMS: [&str; 12] = [
    "pump", "meme", "degen", "inu", "pepe", "cat", "dog", "frog", "wojak", "chad", "ai", "trump",
];

/// Source configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DexScreenerConfig {
    pub api_base_url: String,
    /// Chain id boosts are filtered on
    pub chain: String,
    /// Boosted tokens looked up per run
    pub boost_limit: usize,
    /// Lookups issued concurrently per batch
    pub boost_batch_size: usize,
    pub boost_batch_interval: Duration,
    pub search_terms: Vec<String>,
    pub search_interval: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEXSCREENER_API_BASE.to_string(),
            chain: "solana".to_string(),
            boost_limit: 30,
            boost_batch_size: 5,
            boost_batch_interval: Duration::from_millis(200),
            search_terms: DEFAULT_SEARCH_TERMS.iter().map(|t| t.to_string()).collect(),
            search_interval: Duration::from_millis(150),
        }
    }
}

/// Boosted-list and keyword-search source
pub struct DexScreenerSource {
    config: DexScreenerConfig,
    rules: GraduationRules,
    gateway: Arc<dyn HttpGateway>,
    boost_limiter: RateLimiter,
    search_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl DexScreenerSource {
    pub fn new(
        config: DexScreenerConfig,
        rules: GraduationRules,
        gateway: Arc<dyn HttpGateway>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let boost_limiter =
            RateLimiter::new("dexscreener boosts", config.boost_batch_interval, clock.clone(), sleeper.clone());
        let search_limiter =
            RateLimiter::new("dexscreener search", config.search_interval, clock.clone(), sleeper);

        Self { config, rules, gateway, boost_limiter, search_limiter, clock }
    }

    fn tokens_url(&self, addresses: &[String]) -> String {
        format!("{}/latest/dex/tokens/{}", self.config.api_base_url, addresses.join(","))
    }

    fn search_url(&self, term: &str) -> Result<Url, SkipReason> {
        let endpoint = format!("{}/latest/dex/search", self.config.api_base_url);
        Url::parse_with_params(&endpoint, &[("q", term)]).map_err(|e| SkipReason::Malformed(e.to_string()))
    }

    /// Addresses from the top boosts list, filtered to the target chain
    pub async fn boosted_addresses(&self) -> UnitOutcome<Vec<String>> {
        let url = format!("{}/token-boosts/top/v1", self.config.api_base_url);
        match fetch_json::<Vec<DexBoost>>(self.gateway.as_ref(), &url).await {
            UnitOutcome::Ok(boosts) => {
                let addresses: Vec<String> = boosts
                    .into_iter()
                    .filter(|b| b.chain_id == self.config.chain && !b.token_address.is_empty())
                    .map(|b| b.token_address)
                    .take(self.config.boost_limit)
                    .collect();
                if addresses.is_empty() {
                    UnitOutcome::Skipped(SkipReason::Empty)
                } else {
                    UnitOutcome::Ok(addresses)
                }
            }
            UnitOutcome::Skipped(reason) => UnitOutcome::Skipped(reason),
        }
    }

    /// Look up one address and keep its graduated pairs
    async fn lookup_boosted(&self, address: &str) -> (UnitReport, SourceHarvest) {
        let unit = format!("dexscreener boost {}", address);
        let url = self.tokens_url(&[address.to_string()]);
        let mut harvest = SourceHarvest::default();

        let report = match fetch_json::<DexPairsResponse>(self.gateway.as_ref(), &url).await {
            UnitOutcome::Ok(response) if response.pairs.is_empty() => UnitReport::skipped(unit, SkipReason::Empty),
            UnitOutcome::Ok(response) => {
                harvest.tokens = select_graduated(&response.pairs, &self.rules, self.clock.now());
                UnitReport::ok(unit, harvest.tokens.len())
            }
            UnitOutcome::Skipped(reason) => UnitReport::skipped(unit, reason),
        };
        (report, harvest)
    }

    /// Boosted style: list, then lookups in concurrent batches
    pub async fn fetch_boosted(&self) -> SourceHarvest {
        let mut harvest = SourceHarvest::default();

        let addresses = match self.boosted_addresses().await {
            UnitOutcome::Ok(addresses) => addresses,
            UnitOutcome::Skipped(reason) => {
                harvest.reports.push(UnitReport::skipped("dexscreener boosts", reason));
                return harvest;
            }
        };
        harvest.reports.push(UnitReport::ok("dexscreener boosts", addresses.len()));

        for batch in addresses.chunks(self.config.boost_batch_size.max(1)) {
            self.boost_limiter.acquire().await;
            let results = join_all(batch.iter().map(|address| self.lookup_boosted(address))).await;
            for (report, found) in results {
                harvest.reports.push(report);
                harvest.absorb(found);
            }
        }

        tracing::info!("DexScreener boosts: {} graduated tokens", harvest.tokens.len());
        harvest
    }

    /// Search style: one term at a time
    pub async fn search_all(&self) -> SourceHarvest {
        let mut harvest = SourceHarvest::default();

        for term in &self.config.search_terms {
            self.search_limiter.acquire().await;
            let unit = format!("dexscreener search {}", term);

            let outcome = match self.search_url(term) {
                Ok(url) => fetch_json::<DexPairsResponse>(self.gateway.as_ref(), url.as_str()).await,
                Err(reason) => UnitOutcome::Skipped(reason),
            };

            match outcome {
                UnitOutcome::Ok(response) if response.pairs.is_empty() => {
                    harvest.reports.push(UnitReport::skipped(unit, SkipReason::Empty));
                }
                UnitOutcome::Ok(response) => {
                    let graduated = select_graduated(&response.pairs, &self.rules, self.clock.now());
                    harvest.reports.push(UnitReport::ok(unit, graduated.len()));
                    harvest.tokens.extend(graduated);
                }
                UnitOutcome::Skipped(reason) => harvest.reports.push(UnitReport::skipped(unit, reason)),
            }
        }

        tracing::info!("DexScreener search: {} graduated tokens", harvest.tokens.len());
        harvest
    }
}

#[async_trait]
impl TokenSource for DexScreenerSource {
    fn name(&self) -> &str {
        "dexscreener"
    }

    async fn fetch_all(&self) -> SourceHarvest {
        let (mut harvest, searched) = tokio::join!(self.fetch_boosted(), self.search_all());
        harvest.absorb(searched);
        tracing::info!("DexScreener total: {} tokens", harvest.tokens.len());
        harvest
    }
}

#[async_trait]
impl MetadataLookup for DexScreenerSource {
    fn max_batch(&self) -> usize {
        MAX_ADDRESSES_PER_LOOKUP
    }

    async fn lookup(&self, addresses: &[String]) -> UnitOutcome<Vec<TokenMetadata>> {
        if addresses.is_empty() {
            return UnitOutcome::Ok(Vec::new());
        }

        let url = self.tokens_url(addresses);
        match fetch_json::<DexPairsResponse>(self.gateway.as_ref(), &url).await {
            UnitOutcome::Ok(response) => UnitOutcome::Ok(
                response
                    .pairs
                    .iter()
                    .map(|pair| TokenMetadata {
                        address: pair.base_token.address.clone(),
                        name: Some(pair.base_token.name.clone()).filter(|n| !n.is_empty()),
                        image_url: pair.image_url().map(str::to_string),
                    })
                    .collect(),
            ),
            UnitOutcome::Skipped(reason) => UnitOutcome::Skipped(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dexscreener::types::fixtures::{pair_json, pairs_json};
    use crate::ports::mocks::{ManualClock, MockHttpGateway, RendezvousGateway};
    use chrono::{TimeZone, Utc};

    const BASE: &str = "http://dex.test";

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
    }

    fn recent_ms() -> i64 {
        (now() - chrono::Duration::days(3)).timestamp_millis()
    }

    fn config(terms: &[&str]) -> DexScreenerConfig {
        DexScreenerConfig {
            api_base_url: BASE.to_string(),
            boost_limit: 6,
            search_terms: terms.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn source(config: DexScreenerConfig, mock: &MockHttpGateway, clock: &Arc<ManualClock>) -> DexScreenerSource {
        DexScreenerSource::new(config, GraduationRules::default(), Arc::new(mock.clone()), clock.clone(), clock.clone())
    }

    fn boosts_json(addresses: &[(&str, &str)]) -> String {
        let entries: Vec<String> = addresses
            .iter()
            .map(|(chain, address)| format!(r#"{{"chainId": "{}", "tokenAddress": "{}"}}"#, chain, address))
            .collect();
        format!("[{}]", entries.join(","))
    }

    #[test]
    fn test_default_config() {
        let config = DexScreenerConfig::default();
        assert_eq!(config.boost_limit, 30);
        assert_eq!(config.boost_batch_size, 5);
        assert_eq!(config.search_terms.len(), 12);
        assert_eq!(config.search_terms[0], "pump");
        assert_eq!(config.search_interval, Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_boosts_filtered_capped_and_batched() {
        let mut boosts = vec![("base", "0xnotsolana")];
        let mints: Vec<String> = (0..8).map(|i| format!("Mint{}", i)).collect();
        boosts.extend(mints.iter().map(|m| ("solana", m.as_str())));

        let mut mock = MockHttpGateway::new().with_json(&format!("{}/token-boosts/top/v1", BASE), &boosts_json(&boosts));
        for mint in &mints {
            mock = mock.with_json(
                &format!("{}/latest/dex/tokens/{}", BASE, mint),
                &pairs_json(&[pair_json(mint, "raydium", 200_000.0, recent_ms(), None)]),
            );
        }
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&[]), &mock, &clock);

        let harvest = src.fetch_boosted().await;
        // 6 of 8 solana boosts, in two batches (5 + 1)
        assert_eq!(harvest.tokens.len(), 6);
        assert_eq!(mock.count_calls("/latest/dex/tokens/"), 6);
        assert_eq!(mock.count_calls("0xnotsolana"), 0);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(200)]);
    }

    #[tokio::test]
    async fn test_boosts_and_searches_overlap() {
        let mock = MockHttpGateway::new()
            .with_json(&format!("{}/token-boosts/top/v1", BASE), &boosts_json(&[("solana", "Boosted")]))
            .with_json(
                &format!("{}/latest/dex/tokens/Boosted", BASE),
                &pairs_json(&[pair_json("Boosted", "raydium", 300_000.0, recent_ms(), None)]),
            )
            .with_json(
                &format!("{}/latest/dex/search?q=frog", BASE),
                &pairs_json(&[pair_json("Searched", "pumpswap", 90_000.0, recent_ms(), None)]),
            );
        // each style's first request waits until the other style has started
        let gateway = RendezvousGateway::new(mock.clone(), "/token-boosts/", "/latest/dex/search");
        let clock = Arc::new(ManualClock::new(now()));
        let src = DexScreenerSource::new(
            config(&["frog"]),
            GraduationRules::default(),
            Arc::new(gateway),
            clock.clone(),
            clock,
        );

        let harvest = tokio::time::timeout(Duration::from_secs(5), src.fetch_all())
            .await
            .expect("boosts and searches ran one after the other");

        let mut addresses: Vec<&str> = harvest.tokens.iter().map(|t| t.address.as_str()).collect();
        addresses.sort_unstable();
        assert_eq!(addresses, vec!["Boosted", "Searched"]);
        assert_eq!(mock.count_calls("/token-boosts/top/v1"), 1);
        assert_eq!(mock.count_calls("/latest/dex/search"), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_skips_only_that_address() {
        let mock = MockHttpGateway::new()
            .with_json(
                &format!("{}/token-boosts/top/v1", BASE),
                &boosts_json(&[("solana", "Good"), ("solana", "Broken")]),
            )
            .with_json(
                &format!("{}/latest/dex/tokens/Good", BASE),
                &pairs_json(&[pair_json("Good", "pumpswap", 75_000.0, recent_ms(), None)]),
            )
            .with_status(&format!("{}/latest/dex/tokens/Broken", BASE), 429, "");
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&[]), &mock, &clock);

        let harvest = src.fetch_boosted().await;
        assert_eq!(harvest.tokens.len(), 1);
        assert_eq!(harvest.tokens[0].address, "Good");
        let skipped: Vec<_> = harvest.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].outcome, UnitOutcome::Skipped(SkipReason::HttpStatus(429)));
    }

    #[tokio::test]
    async fn test_boost_list_failure_yields_nothing() {
        let mock = MockHttpGateway::new().with_json(&format!("{}/token-boosts/top/v1", BASE), "<html>");
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&[]), &mock, &clock);

        let harvest = src.fetch_boosted().await;
        assert!(harvest.tokens.is_empty());
        assert_eq!(harvest.reports.len(), 1);
        assert_eq!(mock.get_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_search_terms_are_encoded_and_paced() {
        let mock = MockHttpGateway::new()
            .with_json(
                &format!("{}/latest/dex/search?q=pepe", BASE),
                &pairs_json(&[
                    pair_json("Pepe", "raydium", 3_000_000.0, recent_ms(), Some("https://img/pepe.png")),
                    pair_json("Curve", "pumpfun", 3_000_000.0, recent_ms(), None),
                ]),
            )
            .with_json(&format!("{}/latest/dex/search?q=dog+wif", BASE), r#"{"pairs": []}"#);
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&["pepe", "dog wif", "cat"]), &mock, &clock);

        let harvest = src.search_all().await;
        assert_eq!(harvest.tokens.len(), 1);
        assert_eq!(harvest.tokens[0].image_url.as_deref(), Some("https://img/pepe.png"));
        assert_eq!(mock.count_calls("/latest/dex/search"), 3);
        assert_eq!(mock.count_calls("q=dog+wif"), 1);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(150); 2]);
        // empty results for "dog wif", 404 for "cat"
        assert_eq!(harvest.skipped().count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_combines_styles() {
        let mock = MockHttpGateway::new()
            .with_json(&format!("{}/token-boosts/top/v1", BASE), &boosts_json(&[("solana", "Boosted")]))
            .with_json(
                &format!("{}/latest/dex/tokens/Boosted", BASE),
                &pairs_json(&[pair_json("Boosted", "raydium-clmm", 90_000.0, recent_ms(), None)]),
            )
            .with_json(
                &format!("{}/latest/dex/search?q=frog", BASE),
                &pairs_json(&[pair_json("Frog", "raydium", 600_000.0, recent_ms(), None)]),
            );
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&["frog"]), &mock, &clock);

        let harvest = src.fetch_all().await;
        let mut addresses: Vec<&str> = harvest.tokens.iter().map(|t| t.address.as_str()).collect();
        addresses.sort();
        assert_eq!(addresses, vec!["Boosted", "Frog"]);
    }

    #[tokio::test]
    async fn test_metadata_lookup_joins_addresses() {
        let mock = MockHttpGateway::new().with_json(
            &format!("{}/latest/dex/tokens/A,B", BASE),
            &pairs_json(&[
                pair_json("A", "raydium", 1.0, recent_ms(), Some("https://img/a.png")),
                pair_json("B", "raydium", 1.0, recent_ms(), None),
            ]),
        );
        let clock = Arc::new(ManualClock::new(now()));
        let src = source(config(&[]), &mock, &clock);

        let found = src.lookup(&["A".to_string(), "B".to_string()]).await;
        let UnitOutcome::Ok(found) = found else {
            panic!("lookup skipped");
        };
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].image_url.as_deref(), Some("https://img/a.png"));
        assert_eq!(found[0].name.as_deref(), Some("A Coin"));
        assert!(found[1].image_url.is_none());
        assert_eq!(src.max_batch(), 30);
    }
}
