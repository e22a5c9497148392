//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Outbound HTTP to the data providers
//! - Wall-clock time and rate-limit suspension
//! - A provider domain as a whole, and batched metadata lookups
//! - One full aggregation run (so the cache can be tested without network)

#[cfg(any(test, feature = "test-util"))]
pub mod mocks;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{SourceHarvest, Token, UnitOutcome};

/// Transport-level failure talking to a provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

/// Raw HTTP response, status and body only
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound GET port
#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// Issue a GET expecting JSON. Non-2xx statuses are returned, not errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Wall-clock port
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Suspension port used by rate limiters
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// One provider domain (all of its query styles)
///
/// Implementations never fail as a whole: every page, batch or search
/// term that goes wrong is recorded as a skipped unit in the harvest.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Fetch everything this provider offers, already filtered for graduation
    async fn fetch_all(&self) -> SourceHarvest;
}

/// Metadata one lookup returned for an address
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    pub address: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// Batched metadata lookup used by enrichment
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Most addresses one request may carry
    fn max_batch(&self) -> usize;

    /// One request covering every address in `addresses`
    async fn lookup(&self, addresses: &[String]) -> UnitOutcome<Vec<TokenMetadata>>;
}

/// Total pipeline failure. Only raised when a bug escapes per-unit recovery.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("All provider domains failed: {0}")]
    AllSourcesFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// One full aggregation run: fetch, merge, enrich, sort
#[async_trait]
pub trait TokenPipeline: Send + Sync {
    async fn run(&self) -> Result<Vec<Token>, PipelineError>;
}
