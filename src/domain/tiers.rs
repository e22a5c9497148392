//! Market Cap Tiers
//!
//! Static, disjoint `[min_cap, max_cap)` bands used by the display layer.
//! The top band has no upper bound.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::token::{sort_by_market_cap_desc, Token};

/// One market cap band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub id: String,
    pub label: String,
    /// Inclusive lower bound (USD)
    pub min_cap: f64,
    /// Exclusive upper bound (USD), `None` for the top band
    #[serde(default)]
    pub max_cap: Option<f64>,
    /// Display accent, hex
    #[serde(default)]
    pub color: String,
}

impl Tier {
    pub fn new(id: &str, label: &str, min_cap: f64, max_cap: Option<f64>, color: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            min_cap,
            max_cap,
            color: color.to_string(),
        }
    }

    /// Whether `market_cap` falls in `[min_cap, max_cap)`
    pub fn contains(&self, market_cap: f64) -> bool {
        market_cap >= self.min_cap && self.max_cap.map_or(true, |max| market_cap < max)
    }
}

/// Default bands, highest first
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::new("tier1", "$1M+", 1_000_000.0, None, "#00ff88"),
        Tier::new("tier2", "$500K - $1M", 500_000.0, Some(1_000_000.0), "#10b981"),
        Tier::new("tier3", "$100K - $500K", 100_000.0, Some(500_000.0), "#fbbf24"),
        Tier::new("tier4", "$50K - $100K", 50_000.0, Some(100_000.0), "#f97316"),
    ]
}

/// Tier table validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierError {
    #[error("tier table is empty")]
    Empty,
    #[error("duplicate tier id: {0}")]
    DuplicateId(String),
    #[error("tier {0} has max_cap <= min_cap")]
    InvertedBounds(String),
    #[error("lowest tier starts at {found}, expected {expected}")]
    WrongFloor { expected: f64, found: f64 },
    #[error("gap or overlap between tiers {lower} and {upper}")]
    NotContiguous { lower: String, upper: String },
    #[error("top tier {0} must be unbounded")]
    BoundedTop(String),
}

/// Tokens of one tier, highest market cap first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierGroup {
    pub tier: Tier,
    pub tokens: Vec<Token>,
}

/// Ordered set of tiers
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self { tiers: default_tiers() }
    }
}

impl TierTable {
    /// Build a table, checking that the bands are disjoint, contiguous,
    /// start at `floor` and end unbounded
    pub fn new(tiers: Vec<Tier>, floor: f64) -> Result<Self, TierError> {
        validate_tiers(&tiers, floor)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// The unique tier containing `market_cap`, if any
    pub fn tier_for(&self, market_cap: f64) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.contains(market_cap))
    }

    /// Partition tokens into tiers.
    ///
    /// Every tier appears in table order, possibly empty. Tokens outside
    /// all bands are dropped.
    pub fn group(&self, tokens: &[Token]) -> Vec<TierGroup> {
        let mut groups: Vec<TierGroup> = self
            .tiers
            .iter()
            .map(|tier| TierGroup { tier: tier.clone(), tokens: Vec::new() })
            .collect();

        for token in tokens {
            if let Some(slot) = self.tiers.iter().position(|t| t.contains(token.market_cap)) {
                groups[slot].tokens.push(token.clone());
            }
        }

        for group in &mut groups {
            sort_by_market_cap_desc(&mut group.tokens);
        }

        groups
    }
}

fn validate_tiers(tiers: &[Tier], floor: f64) -> Result<(), TierError> {
    if tiers.is_empty() {
        return Err(TierError::Empty);
    }

    let mut seen = std::collections::HashSet::new();
    for tier in tiers {
        if !seen.insert(tier.id.as_str()) {
            return Err(TierError::DuplicateId(tier.id.clone()));
        }
        if tier.max_cap.is_some_and(|max| max <= tier.min_cap) {
            return Err(TierError::InvertedBounds(tier.id.clone()));
        }
    }

    let mut ascending: Vec<&Tier> = tiers.iter().collect();
    ascending.sort_by(|a, b| a.min_cap.total_cmp(&b.min_cap));

    if ascending[0].min_cap != floor {
        return Err(TierError::WrongFloor { expected: floor, found: ascending[0].min_cap });
    }

    for pair in ascending.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if lower.max_cap != Some(upper.min_cap) {
            return Err(TierError::NotContiguous {
                lower: lower.id.clone(),
                upper: upper.id.clone(),
            });
        }
    }

    let top = ascending[ascending.len() - 1];
    if top.max_cap.is_some() {
        return Err(TierError::BoundedTop(top.id.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::fixtures::token;

    #[test]
    fn test_default_table_is_valid() {
        assert!(TierTable::new(default_tiers(), 50_000.0).is_ok());
    }

    #[test]
    fn test_tier_for_boundaries() {
        let table = TierTable::default();
        assert_eq!(table.tier_for(999_999.0).map(|t| t.id.as_str()), Some("tier2"));
        assert_eq!(table.tier_for(1_000_000.0).map(|t| t.id.as_str()), Some("tier1"));
        assert_eq!(table.tier_for(50_000.0).map(|t| t.id.as_str()), Some("tier4"));
        assert_eq!(table.tier_for(99_999.99).map(|t| t.id.as_str()), Some("tier4"));
        assert_eq!(table.tier_for(500_000_000.0).map(|t| t.id.as_str()), Some("tier1"));
        assert!(table.tier_for(49_999.0).is_none());
    }

    #[test]
    fn test_exactly_one_tier_above_floor() {
        let table = TierTable::default();
        for cap in [50_000.0, 75_000.0, 100_000.0, 499_999.0, 500_000.0, 999_999.0, 1e6, 4e7] {
            let hits = table.tiers().iter().filter(|t| t.contains(cap)).count();
            assert_eq!(hits, 1, "market cap {}", cap);
        }
    }

    #[test]
    fn test_group_sorts_and_drops() {
        let table = TierTable::default();
        let tokens = vec![
            token("low", "LOW", 10_000.0),
            token("a", "A", 120_000.0),
            token("b", "B", 450_000.0),
            token("c", "C", 999_999.0),
            token("d", "D", 3_000_000.0),
            token("e", "E", 60_000.0),
        ];

        let groups = table.group(&tokens);
        assert_eq!(groups.len(), 4);

        let ids = |g: &TierGroup| g.tokens.iter().map(|t| t.address.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&groups[0]), vec!["d"]);
        assert_eq!(ids(&groups[1]), vec!["c"]);
        assert_eq!(ids(&groups[2]), vec!["b", "a"]);
        assert_eq!(ids(&groups[3]), vec!["e"]);

        let total: usize = groups.iter().map(|g| g.tokens.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_empty_tiers_present() {
        let groups = TierTable::default().group(&[]);
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.tokens.is_empty()));
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(TierTable::new(vec![], 50_000.0), Err(TierError::Empty));

        let mut wrong_floor = default_tiers();
        wrong_floor[3].min_cap = 40_000.0;
        assert!(matches!(
            TierTable::new(wrong_floor, 50_000.0),
            Err(TierError::WrongFloor { .. })
        ));

        let mut gap = default_tiers();
        gap[2].max_cap = Some(400_000.0);
        assert!(matches!(
            TierTable::new(gap, 50_000.0),
            Err(TierError::NotContiguous { .. })
        ));

        let mut bounded = default_tiers();
        bounded[0].max_cap = Some(10_000_000.0);
        assert_eq!(
            TierTable::new(bounded, 50_000.0),
            Err(TierError::BoundedTop("tier1".into()))
        );

        let mut dup = default_tiers();
        dup[1].id = "tier1".into();
        assert_eq!(
            TierTable::new(dup, 50_000.0),
            Err(TierError::DuplicateId("tier1".into()))
        );

        let mut inverted = default_tiers();
        inverted[3].max_cap = Some(10_000.0);
        assert_eq!(
            TierTable::new(inverted, 50_000.0),
            Err(TierError::InvertedBounds("tier4".into()))
        );
    }
}
