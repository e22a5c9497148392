//! Graduated Token
//!
//! Canonical post-aggregation record. One per unique on-chain token address.

use serde::{Deserialize, Serialize};

/// Market-data viewer base URL
const DEXSCREENER_WEB_BASE: &str = "https://dexscreener.com";
/// Launchpad origin page base URL
const PUMPFUN_WEB_BASE: &str = "https://pump.fun";

/// Outbound links derived from the token and pair addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLinks {
    /// Pair page on the market-data viewer
    pub dex_screener_url: String,
    /// Token page on the launchpad
    pub pumpfun_url: String,
}

impl TokenLinks {
    /// Build both links for a token trading on `chain` through `pair_address`
    pub fn build(chain: &str, pair_address: &str, address: &str) -> Self {
        Self {
            dex_screener_url: format!("{}/{}/{}", DEXSCREENER_WEB_BASE, chain, pair_address),
            pumpfun_url: format!("{}/{}", PUMPFUN_WEB_BASE, address),
        }
    }
}

/// A graduated token as served to the display layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Token mint address (dedup key, case-sensitive)
    pub address: String,
    pub symbol: String,
    /// Full name, equal to `symbol` when the provider only knows the ticker
    pub name: String,
    pub image_url: Option<String>,
    /// Market cap in USD (falls back to FDV at the provider boundary)
    pub market_cap: f64,
    /// Pool liquidity in USD
    pub liquidity: f64,
    /// Never supplied by current providers
    pub holder_count: Option<u64>,
    pub price_usd: f64,
    /// 24h price change in percent
    pub price_change_24h: f64,
    pub volume_24h: f64,
    /// Pool backing this token
    pub pair_address: String,
    /// Pool creation time in epoch milliseconds
    pub pair_created_at: i64,
    #[serde(flatten)]
    pub links: TokenLinks,
}

impl Token {
    /// Whether the name is only a copy of the ticker
    pub fn has_placeholder_name(&self) -> bool {
        self.name == self.symbol
    }

    /// Whether enrichment still has something to add
    pub fn needs_image(&self) -> bool {
        self.image_url.as_deref().map_or(true, str::is_empty)
    }
}

/// Sort tokens by market cap, highest first. Stable for equal caps.
pub fn sort_by_market_cap_desc(tokens: &mut [Token]) {
    tokens.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
}
