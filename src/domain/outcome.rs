//! Per-unit fetch outcomes
//!
//! A "unit" is the smallest piece of provider work: one page, one lookup
//! batch, one search term. Units never fail the pipeline; they either
//! produce data or are skipped with a reason.

use std::fmt;

use super::token::Token;

/// Why a unit contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Transport failure (connect, timeout, body read)
    Network(String),
    /// Non-success HTTP status
    HttpStatus(u16),
    /// Body was not the expected JSON shape
    Malformed(String),
    /// Valid response with zero records
    Empty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Network(e) => write!(f, "network error: {}", e),
            SkipReason::HttpStatus(code) => write!(f, "HTTP {}", code),
            SkipReason::Malformed(e) => write!(f, "malformed payload: {}", e),
            SkipReason::Empty => write!(f, "empty result"),
        }
    }
}

/// Result of one unit of provider work
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome<T> {
    Ok(T),
    Skipped(SkipReason),
}

impl<T> UnitOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, UnitOutcome::Ok(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            UnitOutcome::Ok(_) => None,
            UnitOutcome::Skipped(reason) => Some(reason),
        }
    }

    /// The data, or the empty contribution for a skipped unit
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            UnitOutcome::Ok(data) => data,
            UnitOutcome::Skipped(_) => T::default(),
        }
    }
}

/// Log line for one finished unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    /// Human-readable unit label, e.g. `trending p2`
    pub unit: String,
    /// Tokens that passed the graduation filter, or why nothing came back
    pub outcome: UnitOutcome<usize>,
}

impl UnitReport {
    pub fn ok(unit: impl Into<String>, accepted: usize) -> Self {
        Self { unit: unit.into(), outcome: UnitOutcome::Ok(accepted) }
    }

    pub fn skipped(unit: impl Into<String>, reason: SkipReason) -> Self {
        Self { unit: unit.into(), outcome: UnitOutcome::Skipped(reason) }
    }
}

/// Everything one provider produced in a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceHarvest {
    pub tokens: Vec<Token>,
    pub reports: Vec<UnitReport>,
}

impl SourceHarvest {
    /// Append another harvest, keeping order
    pub fn absorb(&mut self, other: SourceHarvest) {
        self.tokens.extend(other.tokens);
        self.reports.extend(other.reports);
    }

    /// Units that were skipped
    pub fn skipped(&self) -> impl Iterator<Item = &UnitReport> {
        self.reports.iter().filter(|r| !r.outcome.is_ok())
    }
}
