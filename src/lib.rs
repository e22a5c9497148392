//! gradscan - Graduated Pump.fun token screener library
//!
//! Aggregates recently graduated launchpad tokens from two rate-limited
//! providers into a deduplicated, enriched, market-cap sorted snapshot.
//!
//! # Modules
//!
//! - `domain`: Token model, graduation filter, merge policy, tiers
//! - `ports`: Trait seams (HTTP, clock, sleeper, sources, pipeline)
//! - `adapters`: reqwest gateway, rate limiter, GeckoTerminal, DexScreener, web, CLI
//! - `application`: Aggregator, Enricher, pipeline and snapshot cache
//! - `config`: TOML configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
