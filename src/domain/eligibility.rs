//! Graduation Eligibility
//!
//! Decides whether a provider pool/pair looks like a recently graduated
//! launchpad token. Every provider maps its raw record into a
//! [`GraduationCandidate`] and runs it through the same [`GraduationRules`];
//! only the venue allow-list differs per provider.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::token::Token;

/// Default target chain
pub const DEFAULT_CHAIN: &str = "solana";
/// Lowest displayed market cap (USD), inclusive
pub const DEFAULT_MIN_MARKET_CAP: f64 = 50_000.0;
/// Market cap above which a token counts as established (USD), exclusive
pub const DEFAULT_MAX_MARKET_CAP: f64 = 50_000_000.0;
/// Minimum pool reserve (USD)
pub const DEFAULT_MIN_LIQUIDITY: f64 = 500.0;
/// Trailing window for pool creation
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Provider-neutral view of the fields the filter looks at
#[derive(Debug, Clone, PartialEq)]
pub struct GraduationCandidate<'a> {
    pub chain: &'a str,
    pub venue: &'a str,
    pub created_at: Option<DateTime<Utc>>,
    pub market_cap: Option<f64>,
    pub fdv: Option<f64>,
    pub liquidity: Option<f64>,
}

impl GraduationCandidate<'_> {
    /// Market cap, falling back to FDV when the cap is missing or zero
    pub fn effective_market_cap(&self) -> f64 {
        effective_market_cap(self.market_cap, self.fdv)
    }
}

/// Market cap with FDV fallback. Missing, zero or non-finite values fall through.
pub fn effective_market_cap(market_cap: Option<f64>, fdv: Option<f64>) -> f64 {
    let usable = |v: &f64| v.is_finite() && *v > 0.0;
    market_cap
        .filter(usable)
        .or_else(|| fdv.filter(usable))
        .unwrap_or(0.0)
}

/// A provider record before filtering. Never leaves its adapter.
pub trait RawCandidate {
    /// Fields the graduation filter inspects
    fn candidate(&self) -> GraduationCandidate<'_>;

    /// Canonical token for a record that passed the filter
    fn to_token(&self, now: DateTime<Utc>) -> Token;
}

/// Keep graduated records and map them to tokens, silently dropping the rest
pub fn select_graduated<R: RawCandidate>(
    records: &[R],
    rules: &GraduationRules,
    now: DateTime<Utc>,
) -> Vec<Token> {
    records
        .iter()
        .filter(|record| match rules.check(&record.candidate(), now) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::trace!("candidate dropped: {}", rejection);
                false
            }
        })
        .map(|record| record.to_token(now))
        .collect()
}

/// Why a candidate was dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("wrong chain: {0}")]
    WrongChain(String),
    #[error("venue not allow-listed: {0}")]
    VenueNotAllowed(String),
    #[error("no pool creation time")]
    MissingCreatedAt,
    #[error("pool older than window: {0} days")]
    TooOld(i64),
    #[error("market cap out of band: {0}")]
    MarketCapOutOfBand(f64),
    #[error("liquidity below floor: {0}")]
    LowLiquidity(f64),
}

/// Eligibility thresholds for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct GraduationRules {
    pub chain: String,
    pub allowed_venues: Vec<String>,
    pub max_age: Duration,
    pub min_market_cap: f64,
    pub max_market_cap: f64,
    pub min_liquidity: f64,
}

impl Default for GraduationRules {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            allowed_venues: vec![
                "raydium".to_string(),
                "raydium-clmm".to_string(),
                "pumpswap".to_string(),
            ],
            max_age: Duration::days(DEFAULT_MAX_AGE_DAYS),
            min_market_cap: DEFAULT_MIN_MARKET_CAP,
            max_market_cap: DEFAULT_MAX_MARKET_CAP,
            min_liquidity: DEFAULT_MIN_LIQUIDITY,
        }
    }
}

impl GraduationRules {
    /// Replace the venue allow-list
    pub fn with_venues<I, S>(mut self, venues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_venues = venues.into_iter().map(Into::into).collect();
        self
    }

    /// Run every check in order, returning the first failure
    pub fn check(&self, candidate: &GraduationCandidate<'_>, now: DateTime<Utc>) -> Result<(), Rejection> {
        if candidate.chain != self.chain {
            return Err(Rejection::WrongChain(candidate.chain.to_string()));
        }

        if !self.allowed_venues.iter().any(|v| v == candidate.venue) {
            return Err(Rejection::VenueNotAllowed(candidate.venue.to_string()));
        }

        let created_at = candidate.created_at.ok_or(Rejection::MissingCreatedAt)?;
        let age = now - created_at;
        if age > self.max_age {
            return Err(Rejection::TooOld(age.num_days()));
        }

        let market_cap = candidate.effective_market_cap();
        if market_cap < self.min_market_cap || market_cap >= self.max_market_cap {
            return Err(Rejection::MarketCapOutOfBand(market_cap));
        }

        let liquidity = candidate.liquidity.unwrap_or(0.0);
        if !(liquidity >= self.min_liquidity) {
            return Err(Rejection::LowLiquidity(liquidity));
        }

        Ok(())
    }

    /// Convenience wrapper over [`check`](Self::check)
    pub fn is_graduated(&self, candidate: &GraduationCandidate<'_>, now: DateTime<Utc>) -> bool {
        self.check(candidate, now).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
    }

    fn candidate(market_cap: Option<f64>) -> GraduationCandidate<'static> {
        GraduationCandidate {
            chain: "solana",
            venue: "raydium",
            created_at: Some(now() - Duration::days(3)),
            market_cap,
            fdv: None,
            liquidity: Some(20_000.0),
        }
    }

    #[test]
    fn test_market_cap_lower_bound_inclusive() {
        let rules = GraduationRules::default();
        assert!(rules.is_graduated(&candidate(Some(50_000.0)), now()));
        assert_eq!(
            rules.check(&candidate(Some(49_999.99)), now()),
            Err(Rejection::MarketCapOutOfBand(49_999.99))
        );
    }

    #[test]
    fn test_market_cap_upper_bound_exclusive() {
        let rules = GraduationRules::default();
        assert!(rules.is_graduated(&candidate(Some(49_999_999.0)), now()));
        assert!(!rules.is_graduated(&candidate(Some(50_000_000.0)), now()));
    }

    #[test]
    fn test_fdv_fallback() {
        let rules = GraduationRules::default();
        let mut c = candidate(None);
        c.fdv = Some(120_000.0);
        assert_eq!(c.effective_market_cap(), 120_000.0);
        assert!(rules.is_graduated(&c, now()));

        // zero market cap also falls back
        c.market_cap = Some(0.0);
        assert_eq!(c.effective_market_cap(), 120_000.0);

        c.fdv = None;
        assert_eq!(c.effective_market_cap(), 0.0);
        assert!(!rules.is_graduated(&c, now()));
    }

    #[test]
    fn test_wrong_chain_and_venue() {
        let rules = GraduationRules::default();
        let mut c = candidate(Some(100_000.0));
        c.chain = "ethereum";
        assert_eq!(rules.check(&c, now()), Err(Rejection::WrongChain("ethereum".into())));

        let mut c = candidate(Some(100_000.0));
        c.venue = "pumpfun";
        assert_eq!(rules.check(&c, now()), Err(Rejection::VenueNotAllowed("pumpfun".into())));
    }

    #[test]
    fn test_custom_venues() {
        let rules = GraduationRules::default().with_venues(["pump-fun-amm"]);
        let mut c = candidate(Some(100_000.0));
        assert!(!rules.is_graduated(&c, now()));
        c.venue = "pump-fun-amm";
        assert!(rules.is_graduated(&c, now()));
    }

    #[test]
    fn test_age_window() {
        let rules = GraduationRules::default();
        let mut c = candidate(Some(100_000.0));

        c.created_at = Some(now() - Duration::days(30));
        assert!(rules.is_graduated(&c, now()));

        c.created_at = Some(now() - Duration::days(30) - Duration::seconds(1));
        assert_eq!(rules.check(&c, now()), Err(Rejection::TooOld(30)));

        c.created_at = None;
        assert_eq!(rules.check(&c, now()), Err(Rejection::MissingCreatedAt));
    }

    #[test]
    fn test_liquidity_floor() {
        let rules = GraduationRules::default();
        let mut c = candidate(Some(100_000.0));

        c.liquidity = Some(500.0);
        assert!(rules.is_graduated(&c, now()));

        c.liquidity = Some(499.0);
        assert_eq!(rules.check(&c, now()), Err(Rejection::LowLiquidity(499.0)));

        c.liquidity = None;
        assert!(!rules.is_graduated(&c, now()));

        c.liquidity = Some(f64::NAN);
        assert!(!rules.is_graduated(&c, now()));
    }
}
