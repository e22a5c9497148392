//! Domain Layer - Core aggregation logic
//!
//! Pure, I/O-free building blocks of the graduated token pipeline:
//! - `token`: canonical Token record and outbound links
//! - `eligibility`: graduation filter shared by all providers
//! - `merge`: cross-source deduplication
//! - `tiers`: market cap bands and grouping
//! - `outcome`: per-unit fetch results

pub mod eligibility;
pub mod merge;
pub mod outcome;
pub mod tiers;
pub mod token;

pub use eligibility::{
    effective_market_cap, select_graduated, GraduationCandidate, GraduationRules, RawCandidate,
    Rejection,
};
pub use merge::{deduplicate, merge_into};
pub use outcome::{SkipReason, SourceHarvest, UnitOutcome, UnitReport};
pub use tiers::{default_tiers, Tier, TierError, TierGroup, TierTable};
pub use token::{sort_by_market_cap_desc, Token, TokenLinks};
