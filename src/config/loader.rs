//! Configuration Loader
//!
//! Every setting has a compiled-in default; an optional TOML file can
//! override any section. There are no environment overrides.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::dexscreener::{DexScreenerConfig, DEFAULT_SEARCH_TERMS, DEXSCREENER_API_BASE, MAX_ADDRESSES_PER_LOOKUP};
use crate::adapters::geckoterminal::{GeckoTerminalConfig, GECKOTERMINAL_API_BASE};
use crate::adapters::http::HttpConfig;
use crate::application::EnrichmentConfig;
use crate::domain::eligibility::{
    DEFAULT_CHAIN, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_MARKET_CAP, DEFAULT_MIN_LIQUIDITY, DEFAULT_MIN_MARKET_CAP,
};
use crate::domain::{default_tiers, GraduationRules, Tier, TierTable};

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpSection,
    pub geckoterminal: GeckoTerminalSection,
    pub dexscreener: DexScreenerSection,
    pub eligibility: EligibilitySection,
    pub enrichment: EnrichmentSection,
    pub cache: CacheSection,
    pub server: ServerSection,
    pub logging: LoggingSection,
    pub tiers: TiersSection,
}

/// Outbound HTTP section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            user_agent: defaults.user_agent,
        }
    }
}

/// GeckoTerminal section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeckoTerminalSection {
    pub api_base_url: String,
    /// Venues counted as post-graduation on this provider
    pub venues: Vec<String>,
    pub trending_pages: u32,
    /// DEX slugs paged individually
    pub dexes: Vec<String>,
    pub dex_pages: u32,
    pub new_pool_pages: u32,
    pub request_interval_ms: u64,
    /// Optional hard cap, 0 or absent means none
    pub requests_per_minute: Option<u32>,
}

impl Default for GeckoTerminalSection {
    fn default() -> Self {
        let defaults = GeckoTerminalConfig::default();
        Self {
            api_base_url: GECKOTERMINAL_API_BASE.to_string(),
            venues: ["raydium", "raydium-clmm", "pumpswap", "pump-fun-amm"].map(String::from).to_vec(),
            trending_pages: defaults.trending_pages,
            dexes: defaults.dexes,
            dex_pages: defaults.dex_pages,
            new_pool_pages: defaults.new_pool_pages,
            request_interval_ms: defaults.request_interval.as_millis() as u64,
            requests_per_minute: None,
        }
    }
}

/// DexScreener section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DexScreenerSection {
    pub api_base_url: String,
    pub venues: Vec<String>,
    pub boost_limit: usize,
    pub boost_batch_size: usize,
    pub boost_batch_interval_ms: u64,
    pub search_terms: Vec<String>,
    pub search_interval_ms: u64,
}

impl Default for DexScreenerSection {
    fn default() -> Self {
        Self {
            api_base_url: DEXSCREENER_API_BASE.to_string(),
            venues: ["raydium", "raydium-clmm", "pumpswap"].map(String::from).to_vec(),
            boost_limit: 30,
            boost_batch_size: 5,
            boost_batch_interval_ms: 200,
            search_terms: DEFAULT_SEARCH_TERMS.map(String::from).to_vec(),
            search_interval_ms: 150,
        }
    }
}

/// Graduation thresholds shared by both providers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EligibilitySection {
    pub chain: String,
    pub max_age_days: i64,
    /// Inclusive lower bound (USD)
    pub min_market_cap: f64,
    /// Exclusive upper bound (USD)
    pub max_market_cap: f64,
    pub min_liquidity: f64,
}

impl Default for EligibilitySection {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            min_market_cap: DEFAULT_MIN_MARKET_CAP,
            max_market_cap: DEFAULT_MAX_MARKET_CAP,
            min_liquidity: DEFAULT_MIN_LIQUIDITY,
        }
    }
}

/// Metadata enrichment section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentSection {
    pub max_candidates: usize,
    /// Addresses per lookup, at most 30
    pub batch_size: usize,
    pub batch_interval_ms: u64,
}

impl Default for EnrichmentSection {
    fn default() -> Self {
        let defaults = EnrichmentConfig::default();
        Self {
            max_candidates: defaults.max_candidates,
            batch_size: defaults.batch_size,
            batch_interval_ms: defaults.batch_interval.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// HTTP endpoint section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000 }
    }
}

impl ServerSection {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// `[[tiers]]` array, defaulting to the built-in bands
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TiersSection(pub Vec<TierEntry>);

impl Default for TiersSection {
    fn default() -> Self {
        Self(default_tiers().into_iter().map(TierEntry::from).collect())
    }
}

/// One `[[tiers]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct TierEntry {
    pub id: String,
    pub label: String,
    pub min_cap: f64,
    #[serde(default)]
    pub max_cap: Option<f64>,
    #[serde(default)]
    pub color: String,
}

impl From<Tier> for TierEntry {
    fn from(tier: Tier) -> Self {
        Self {
            id: tier.id,
            label: tier.label,
            min_cap: tier.min_cap,
            max_cap: tier.max_cap,
            color: tier.color,
        }
    }
}

impl From<&TierEntry> for Tier {
    fn from(entry: &TierEntry) -> Self {
        Tier::new(&entry.id, &entry.label, entry.min_cap, entry.max_cap, &entry.color)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file (`~` is expanded)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let raw = path.as_ref().to_string_lossy();
    let expanded = shellexpand::tilde(&raw);
    let content = std::fs::read_to_string(expanded.as_ref())?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, else the built-in defaults
pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs must be > 0"));
        }

        // GeckoTerminal
        let gecko = &self.geckoterminal;
        if gecko.api_base_url.is_empty() {
            return Err(invalid("geckoterminal.api_base_url cannot be empty"));
        }
        if gecko.venues.is_empty() {
            return Err(invalid("geckoterminal.venues cannot be empty"));
        }
        if gecko.trending_pages == 0 || gecko.new_pool_pages == 0 || gecko.dex_pages == 0 {
            return Err(invalid("geckoterminal page counts must be > 0"));
        }

        // DexScreener
        let dex = &self.dexscreener;
        if dex.api_base_url.is_empty() {
            return Err(invalid("dexscreener.api_base_url cannot be empty"));
        }
        if dex.venues.is_empty() {
            return Err(invalid("dexscreener.venues cannot be empty"));
        }
        if dex.boost_batch_size == 0 {
            return Err(invalid("dexscreener.boost_batch_size must be > 0"));
        }

        // Eligibility
        let rules = &self.eligibility;
        if rules.chain.is_empty() {
            return Err(invalid("eligibility.chain cannot be empty"));
        }
        self.max_age()?;
        if !(rules.min_market_cap < rules.max_market_cap) {
            return Err(invalid(format!(
                "eligibility.min_market_cap ({}) must be below max_market_cap ({})",
                rules.min_market_cap, rules.max_market_cap
            )));
        }
        if !(rules.min_liquidity >= 0.0) {
            return Err(invalid(format!(
                "eligibility.min_liquidity must be >= 0, got {}",
                rules.min_liquidity
            )));
        }

        // Enrichment
        let enrichment = &self.enrichment;
        if enrichment.batch_size == 0 || enrichment.batch_size > MAX_ADDRESSES_PER_LOOKUP {
            return Err(invalid(format!(
                "enrichment.batch_size must be 1-{}, got {}",
                MAX_ADDRESSES_PER_LOOKUP, enrichment.batch_size
            )));
        }

        if self.cache.ttl_secs == 0 {
            return Err(invalid("cache.ttl_secs must be > 0"));
        }

        self.tier_table()?;

        Ok(())
    }

    /// Creation-time window; positive and representable as a `chrono::Duration`
    pub fn max_age(&self) -> Result<chrono::Duration, ConfigError> {
        let days = self.eligibility.max_age_days;
        if days <= 0 {
            return Err(invalid(format!("eligibility.max_age_days must be > 0, got {}", days)));
        }
        chrono::Duration::try_days(days)
            .ok_or_else(|| invalid(format!("eligibility.max_age_days out of range, got {}", days)))
    }

    fn rules_with_venues(&self, venues: &[String]) -> Result<GraduationRules, ConfigError> {
        Ok(GraduationRules {
            chain: self.eligibility.chain.clone(),
            allowed_venues: venues.to_vec(),
            max_age: self.max_age()?,
            min_market_cap: self.eligibility.min_market_cap,
            max_market_cap: self.eligibility.max_market_cap,
            min_liquidity: self.eligibility.min_liquidity,
        })
    }

    /// Graduation rules with the GeckoTerminal venue list
    pub fn gecko_rules(&self) -> Result<GraduationRules, ConfigError> {
        self.rules_with_venues(&self.geckoterminal.venues)
    }

    /// Graduation rules with the DexScreener venue list
    pub fn dex_rules(&self) -> Result<GraduationRules, ConfigError> {
        self.rules_with_venues(&self.dexscreener.venues)
    }

    /// Tier table whose floor must equal the eligibility floor
    pub fn tier_table(&self) -> Result<TierTable, ConfigError> {
        let tiers = self.tiers.0.iter().map(Tier::from).collect();
        TierTable::new(tiers, self.eligibility.min_market_cap).map_err(|e| invalid(format!("tiers: {}", e)))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

impl From<&Config> for HttpConfig {
    fn from(config: &Config) -> Self {
        HttpConfig {
            timeout: Duration::from_secs(config.http.timeout_secs),
            user_agent: config.http.user_agent.clone(),
        }
    }
}

impl From<&Config> for GeckoTerminalConfig {
    fn from(config: &Config) -> Self {
        let section = &config.geckoterminal;
        GeckoTerminalConfig {
            api_base_url: section.api_base_url.clone(),
            network: config.eligibility.chain.clone(),
            trending_pages: section.trending_pages,
            dexes: section.dexes.clone(),
            dex_pages: section.dex_pages,
            new_pool_pages: section.new_pool_pages,
            request_interval: Duration::from_millis(section.request_interval_ms),
            requests_per_minute: section.requests_per_minute.filter(|rpm| *rpm > 0),
        }
    }
}

impl From<&Config> for DexScreenerConfig {
    fn from(config: &Config) -> Self {
        let section = &config.dexscreener;
        DexScreenerConfig {
            api_base_url: section.api_base_url.clone(),
            chain: config.eligibility.chain.clone(),
            boost_limit: section.boost_limit,
            boost_batch_size: section.boost_batch_size,
            boost_batch_interval: Duration::from_millis(section.boost_batch_interval_ms),
            search_terms: section.search_terms.clone(),
            search_interval: Duration::from_millis(section.search_interval_ms),
        }
    }
}

impl From<&Config> for EnrichmentConfig {
    fn from(config: &Config) -> Self {
        EnrichmentConfig {
            max_candidates: config.enrichment.max_candidates,
            batch_size: config.enrichment.batch_size,
            batch_interval: Duration::from_millis(config.enrichment.batch_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn assert_invalid(content: &str) {
        let file = write_config(content);
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ConfigError::ValidationError(_))),
            "expected validation error for:\n{}",
            content
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();

        assert_eq!(config.geckoterminal.venues.len(), 4);
        assert_eq!(config.dexscreener.venues, vec!["raydium", "raydium-clmm", "pumpswap"]);
        assert_eq!(config.dexscreener.search_terms.len(), 12);
        assert_eq!(config.enrichment.max_candidates, 150);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.tier_table().unwrap(), TierTable::default());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.eligibility.min_market_cap, 50_000.0);
        assert_eq!(config.geckoterminal.trending_pages, 10);
    }

    #[test]
    fn test_partial_override() {
        let file = write_config(
            r#"
[geckoterminal]
trending_pages = 3
dexes = ["raydium"]

[dexscreener]
search_terms = ["bonk"]

[cache]
ttl_secs = 60

[server]
port = 8080
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.geckoterminal.trending_pages, 3);
        assert_eq!(config.geckoterminal.dex_pages, 5);
        assert_eq!(config.dexscreener.search_terms, vec!["bonk"]);
        assert_eq!(config.dexscreener.boost_limit, 30);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");

        let gecko = GeckoTerminalConfig::from(&config);
        assert_eq!(gecko.trending_pages, 3);
        assert_eq!(gecko.network, "solana");
        assert_eq!(gecko.request_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_custom_tiers() {
        let file = write_config(
            r#"
[eligibility]
min_market_cap = 100000

[[tiers]]
id = "big"
label = "Big"
min_cap = 1000000

[[tiers]]
id = "small"
label = "Small"
min_cap = 100000
max_cap = 1000000
"#,
        );
        let config = load_config(file.path()).unwrap();
        let table = config.tier_table().unwrap();
        assert_eq!(table.tiers().len(), 2);
        assert_eq!(table.tier_for(150_000.0).map(|t| t.id.as_str()), Some("small"));
    }

    #[test]
    fn test_tier_floor_must_match_eligibility() {
        assert_invalid(
            r#"
[eligibility]
min_market_cap = 75000
"#,
        );
    }

    #[test]
    fn test_invalid_sections() {
        assert_invalid("[geckoterminal]\ntrending_pages = 0\n");
        assert_invalid("[geckoterminal]\napi_base_url = \"\"\n");
        assert_invalid("[dexscreener]\nboost_batch_size = 0\n");
        assert_invalid("[enrichment]\nbatch_size = 31\n");
        assert_invalid("[eligibility]\nmax_market_cap = 50000\n");
        assert_invalid("[eligibility]\nmin_liquidity = -1\n");
        assert_invalid("[eligibility]\nmax_age_days = 0\n");
        assert_invalid("[eligibility]\nmax_age_days = 200000000000\n");
        assert_invalid("[cache]\nttl_secs = 0\n");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/gradscan.toml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("[cache]\nttl_secs = \"soon\"\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_rules_per_provider() {
        let config = Config::default();
        let gecko = config.gecko_rules().unwrap();
        let dex = config.dex_rules().unwrap();
        assert!(gecko.allowed_venues.contains(&"pump-fun-amm".to_string()));
        assert!(!dex.allowed_venues.contains(&"pump-fun-amm".to_string()));
        assert_eq!(dex.max_age, chrono::Duration::days(30));
    }

    #[test]
    fn test_age_window_out_of_range_is_an_error() {
        let mut config = Config::default();
        config.eligibility.max_age_days = 200_000_000_000;

        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
        assert!(matches!(config.gecko_rules(), Err(ConfigError::ValidationError(_))));
        assert!(matches!(config.dex_rules(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_load_or_default() {
        let config = load_or_default::<&str>(None).unwrap();
        assert_eq!(config.logging.level, "info");
    }
}
