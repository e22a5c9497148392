//! DexScreener Types
//!
//! Pair payloads are shared by `/latest/dex/tokens/*` and
//! `/latest/dex/search`; boosts come from `/token-boosts/top/v1`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::adapters::http::lenient::{opt_f64, opt_i64};
use crate::domain::{effective_market_cap, GraduationCandidate, RawCandidate, Token, TokenLinks};

/// `{ "pairs": [...] }`; `pairs` may be null or absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexPairsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pairs: Vec<DexPair>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<DexPair>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<DexPair>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: String,
    #[serde(default)]
    pub pair_address: String,
    #[serde(default)]
    pub base_token: DexTokenRef,
    #[serde(default, deserialize_with = "opt_f64")]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub price_change: Option<DexWindowed>,
    #[serde(default)]
    pub volume: Option<DexWindowed>,
    #[serde(default)]
    pub liquidity: Option<DexLiquidity>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub fdv: Option<f64>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub market_cap: Option<f64>,
    /// Epoch milliseconds
    #[serde(default, deserialize_with = "opt_i64")]
    pub pair_created_at: Option<i64>,
    #[serde(default)]
    pub info: Option<DexPairInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexTokenRef {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexWindowed {
    #[serde(default, deserialize_with = "opt_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexLiquidity {
    #[serde(default, deserialize_with = "opt_f64")]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One entry of the top boosts list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexBoost {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub token_address: String,
}

impl DexPair {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.pair_created_at
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Image URL, ignoring blanks
    pub fn image_url(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|info| info.image_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    fn h24(windowed: &Option<DexWindowed>) -> f64 {
        windowed.as_ref().and_then(|w| w.h24).unwrap_or(0.0)
    }
}

impl RawCandidate for DexPair {
    fn candidate(&self) -> GraduationCandidate<'_> {
        GraduationCandidate {
            chain: &self.chain_id,
            venue: &self.dex_id,
            created_at: self.created_at(),
            market_cap: self.market_cap,
            fdv: self.fdv,
            liquidity: self.liquidity.as_ref().and_then(|l| l.usd),
        }
    }

    fn to_token(&self, now: DateTime<Utc>) -> Token {
        let base = &self.base_token;
        let name = if base.name.is_empty() { base.symbol.clone() } else { base.name.clone() };

        Token {
            address: base.address.clone(),
            symbol: base.symbol.clone(),
            name,
            image_url: self.image_url().map(str::to_string),
            market_cap: effective_market_cap(self.market_cap, self.fdv),
            liquidity: self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0),
            holder_count: None,
            price_usd: self.price_usd.unwrap_or(0.0),
            price_change_24h: Self::h24(&self.price_change),
            volume_24h: Self::h24(&self.volume),
            pair_address: self.pair_address.clone(),
            pair_created_at: self.pair_created_at.unwrap_or_else(|| now.timestamp_millis()),
            links: TokenLinks::build(&self.chain_id, &self.pair_address, &base.address),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Minimal pair JSON accepted by the default graduation rules
    pub fn pair_json(address: &str, dex: &str, market_cap: f64, created_ms: i64, image: Option<&str>) -> String {
        let info = image
            .map(|url| format!(r#","info": {{"imageUrl": "{}"}}"#, url))
            .unwrap_or_default();
        format!(
            r#"{{
                "chainId": "solana",
                "dexId": "{dex}",
                "pairAddress": "pair_{address}",
                "baseToken": {{"address": "{address}", "name": "{address} Coin", "symbol": "{address}"}},
                "priceUsd": "0.0005",
                "priceChange": {{"h24": 3.5}},
                "volume": {{"h24": 12000}},
                "liquidity": {{"usd": 8000}},
                "marketCap": {market_cap},
                "pairCreatedAt": {created_ms}{info}
            }}"#
        )
    }

    pub fn pairs_json(pairs: &[String]) -> String {
        format!(r#"{{"pairs": [{}]}}"#, pairs.join(","))
    }
}
