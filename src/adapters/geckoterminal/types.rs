//! GeckoTerminal Types
//!
//! Raw JSON:API mappings for the `/pools` style endpoints. Numeric
//! attributes arrive as strings on most endpoints and as numbers on a few,
//! so all of them go through the lenient decoders.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::adapters::http::lenient::opt_f64;
use crate::domain::{effective_market_cap, GraduationCandidate, RawCandidate, Token, TokenLinks};

/// Symbol used when the pool name has no usable base ticker
const UNKNOWN_SYMBOL: &str = "???";

/// Page of pools
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeckoPoolResponse {
    #[serde(default)]
    pub data: Vec<GeckoPool>,
}

/// One pool. Relationship blocks are optional so a single malformed pool
/// is rejected on its own instead of failing the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct GeckoPool {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: GeckoPoolAttributes,
    #[serde(default)]
    pub relationships: Option<GeckoPoolRelationships>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeckoPoolAttributes {
    /// Pool (pair) address
    #[serde(default)]
    pub address: String,
    /// `"BASE / QUOTE"`, sometimes with a fee suffix
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_f64")]
    pub base_token_price_usd: Option<f64>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub pool_created_at: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub fdv_usd: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub market_cap_usd: Option<f64>,
    #[serde(default)]
    pub price_change_percentage: Option<GeckoWindowed>,
    #[serde(default)]
    pub volume_usd: Option<GeckoWindowed>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub reserve_in_usd: Option<f64>,
}

/// Per-window figures; only the 24h window is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeckoWindowed {
    #[serde(default, deserialize_with = "opt_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeckoPoolRelationships {
    #[serde(default)]
    pub base_token: Option<GeckoRef>,
    #[serde(default)]
    pub dex: Option<GeckoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeckoRef {
    #[serde(default)]
    pub data: Option<GeckoRefData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeckoRefData {
    /// `"{network}_{address}"` for tokens, slug for dexes
    #[serde(default)]
    pub id: String,
}

impl GeckoRef {
    fn id(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.id.as_str())
    }
}

impl GeckoPool {
    fn base_token_id(&self) -> &str {
        self.relationships
            .as_ref()
            .and_then(|r| r.base_token.as_ref())
            .and_then(GeckoRef::id)
            .unwrap_or("")
    }

    /// Network prefix of the base token id; empty when the pool has no base token
    pub fn chain(&self) -> &str {
        self.base_token_id().split_once('_').map_or("", |(chain, _)| chain)
    }

    /// Base token mint address, network prefix removed
    pub fn token_address(&self) -> &str {
        let id = self.base_token_id();
        id.split_once('_').map_or(id, |(_, address)| address)
    }

    /// Dex slug; empty when the pool has no dex relationship
    pub fn dex_id(&self) -> &str {
        self.relationships
            .as_ref()
            .and_then(|r| r.dex.as_ref())
            .and_then(GeckoRef::id)
            .unwrap_or("")
    }

    /// Base ticker from the pool name
    pub fn symbol(&self) -> &str {
        self.attributes
            .name
            .split(" / ")
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SYMBOL)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.attributes
            .pool_created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn h24(windowed: &Option<GeckoWindowed>) -> f64 {
        windowed.as_ref().and_then(|w| w.h24).unwrap_or(0.0)
    }
}

impl RawCandidate for GeckoPool {
    // a pool missing its base token or dex carries an empty chain or venue,
    // which no rule set accepts
    fn candidate(&self) -> GraduationCandidate<'_> {
        GraduationCandidate {
            chain: self.chain(),
            venue: self.dex_id(),
            created_at: self.created_at(),
            market_cap: self.attributes.market_cap_usd,
            fdv: self.attributes.fdv_usd,
            liquidity: Some(self.attributes.reserve_in_usd.unwrap_or(0.0)),
        }
    }

    fn to_token(&self, now: DateTime<Utc>) -> Token {
        let address = self.token_address().to_string();
        let symbol = self.symbol().to_string();
        let pair_address = self.attributes.address.clone();
        let attrs = &self.attributes;

        Token {
            links: TokenLinks::build(self.chain(), &pair_address, &address),
            // pool names only carry the ticker
            name: symbol.clone(),
            symbol,
            image_url: None,
            market_cap: effective_market_cap(attrs.market_cap_usd, attrs.fdv_usd),
            liquidity: attrs.reserve_in_usd.unwrap_or(0.0),
            holder_count: None,
            price_usd: attrs.base_token_price_usd.unwrap_or(0.0),
            price_change_24h: Self::h24(&attrs.price_change_percentage),
            volume_24h: Self::h24(&attrs.volume_usd),
            pair_created_at: self.created_at().unwrap_or(now).timestamp_millis(),
            pair_address,
            address,
        }
    }
}
