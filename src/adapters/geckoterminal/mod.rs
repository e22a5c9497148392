//! GeckoTerminal Adapter
//!
//! Comprehensive pool index. Three query modes (trending, per-DEX listings,
//! newest pools) run strictly one after another against a shared budget:
//!
//! - `/networks/{network}/trending_pools?page=N`
//! - `/networks/{network}/dexes/{dex}/pools?page=N&sort=h24_volume_usd_desc`
//! - `/networks/{network}/new_pools?page=N`
//!
//! A failed or empty page ends its mode; other modes still run.

mod client;
mod types;

pub use client::{GeckoTerminalConfig, GeckoTerminalSource, QueryMode, GECKOTERMINAL_API_BASE};
pub use types::{GeckoPool, GeckoPoolAttributes, GeckoPoolResponse};
