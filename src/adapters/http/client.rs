//! Reqwest Gateway
//!
//! Plain GET client used by both providers. No retries: a failed unit is
//! skipped, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::domain::{SkipReason, UnitOutcome};
use crate::ports::{FetchError, HttpGateway, HttpResponse};

/// Configuration for the HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent to providers
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("gradscan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// reqwest implementation of the outbound HTTP port
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    http: Client,
}

impl ReqwestGateway {
    /// Create a gateway with default configuration
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a gateway with custom configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(e.to_string())
                } else {
                    FetchError::Request(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// GET `url` and decode the body as `T`.
///
/// Transport errors, non-2xx statuses, empty bodies and schema mismatches
/// all become [`UnitOutcome::Skipped`] and are logged at `warn`.
pub async fn fetch_json<T: DeserializeOwned>(gateway: &dyn HttpGateway, url: &str) -> UnitOutcome<T> {
    let outcome = match gateway.get(url).await {
        Err(e) => UnitOutcome::Skipped(SkipReason::Network(e.to_string())),
        Ok(response) if !response.is_success() => {
            UnitOutcome::Skipped(SkipReason::HttpStatus(response.status))
        }
        Ok(response) if response.body.trim().is_empty() => {
            UnitOutcome::Skipped(SkipReason::Malformed("empty body".into()))
        }
        Ok(response) => match serde_json::from_str::<T>(&response.body) {
            Ok(data) => UnitOutcome::Ok(data),
            Err(e) => UnitOutcome::Skipped(SkipReason::Malformed(e.to_string())),
        },
    };

    if let Some(reason) = outcome.skip_reason() {
        tracing::warn!("GET {} skipped: {}", url, reason);
    }

    outcome
}
