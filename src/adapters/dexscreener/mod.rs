//! DexScreener Adapter
//!
//! - `/token-boosts/top/v1` then `/latest/dex/tokens/{address}` per boost
//! - `/latest/dex/search?q={term}` for each configured term
//! - `/latest/dex/tokens/{a,b,c}` for enrichment lookups (30 max)

mod client;
mod types;

pub use client::{
    DexScreenerConfig, DexScreenerSource, DEFAULT_SEARCH_TERMS, DEXSCREENER_API_BASE, MAX_ADDRESSES_PER_LOOKUP,
};
pub use types::{DexBoost, DexPair, DexPairsResponse};
