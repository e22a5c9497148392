//! Configuration Module
//!
//! Compiled-in defaults, optionally overridden by a TOML file.

pub mod loader;

pub use loader::{
    load_config, load_or_default, CacheSection, Config, ConfigError, DexScreenerSection, EligibilitySection,
    EnrichmentSection, GeckoTerminalSection, HttpSection, LoggingSection, ServerSection, TierEntry, TiersSection,
};
