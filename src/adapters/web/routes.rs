//! `/api/tokens` endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::application::SnapshotService;
use crate::domain::Token;

/// Fixed description of what the data can and cannot tell
pub const LIMITATIONS: &str = "This data is aggregated from DexScreener API using heuristics to identify likely \
Pump.fun graduated tokens. The list may not be complete. Holder counts are not available from DexScreener.";

/// Limitations text served alongside a failure
pub const ERROR_LIMITATIONS: &str = "API error occurred while fetching data.";

/// Generic client-facing failure message
pub const FETCH_ERROR: &str = "Failed to fetch token data";

/// Response envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensApiResponse {
    pub tokens: Vec<Token>,
    /// Epoch milliseconds
    pub last_updated: i64,
    pub total_count: usize,
    pub limitations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TokensApiResponse {
    pub fn success(tokens: Vec<Token>, last_updated: i64) -> Self {
        Self {
            total_count: tokens.len(),
            tokens,
            last_updated,
            limitations: LIMITATIONS.to_string(),
            error: None,
        }
    }

    pub fn failure(last_updated: i64) -> Self {
        Self {
            tokens: Vec::new(),
            last_updated,
            total_count: 0,
            limitations: ERROR_LIMITATIONS.to_string(),
            error: Some(FETCH_ERROR.to_string()),
        }
    }
}

/// GET /api/tokens
async fn list_tokens(State(service): State<Arc<SnapshotService>>) -> (StatusCode, Json<TokensApiResponse>) {
    match service.get_snapshot().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(TokensApiResponse::success(
                snapshot.tokens.clone(),
                snapshot.computed_at.timestamp_millis(),
            )),
        ),
        // details stay in the logs
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TokensApiResponse::failure(service.now().timestamp_millis())),
        ),
    }
}

pub fn create_router(service: Arc<SnapshotService>) -> Router {
    Router::new().route("/api/tokens", get(list_tokens)).with_state(service)
}
