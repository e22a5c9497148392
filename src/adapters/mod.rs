//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - HTTP: reqwest gateway and lenient JSON decoding
//! - Rate limit: fixed-interval limiter per provider budget
//! - GeckoTerminal: paginated pool index (sequential modes)
//! - DexScreener: boosted list + keyword search, enrichment lookups
//! - Web: axum endpoint serving the snapshot
//! - CLI: Command-line interface handlers

pub mod cli;
pub mod dexscreener;
pub mod geckoterminal;
pub mod http;
pub mod rate_limit;
pub mod web;

pub use cli::CliApp;
pub use dexscreener::{DexScreenerConfig, DexScreenerSource};
pub use geckoterminal::{GeckoTerminalConfig, GeckoTerminalSource};
pub use http::ReqwestGateway;
pub use rate_limit::RateLimiter;
