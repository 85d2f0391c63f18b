//! Scored report records and the client-side sort over them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One influencer's evaluation against one brief, as returned by
/// `GET /reports/{briefId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInfluencer {
    pub influencer_id: i64,
    pub brief_id: i64,
    /// Platform handle without the leading `@`.
    pub handle: String,
    pub authenticity: f64,
    pub relevance: f64,
    pub resonance: f64,
    /// Return-on-ad-spend multiplier, not a percentage.
    pub expected_roas: f64,
    pub trust_index: f64,
    #[serde(default)]
    pub top_signals: Vec<String>,
}

/// Metric a report can be ranked by. Every key sorts descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Trust,
    Auth,
    Rel,
    Res,
    Roas,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Trust,
        SortKey::Auth,
        SortKey::Rel,
        SortKey::Res,
        SortKey::Roas,
    ];

    /// Short name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Trust => "trust",
            SortKey::Auth => "auth",
            SortKey::Rel => "rel",
            SortKey::Res => "res",
            SortKey::Roas => "roas",
        }
    }

    /// Display label for headings and menus.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Trust => "Trust",
            SortKey::Auth => "Authenticity",
            SortKey::Rel => "Relevance",
            SortKey::Res => "Resonance",
            SortKey::Roas => "ROAS",
        }
    }

    /// Reads the metric this key ranks by.
    #[must_use]
    pub fn metric(self, row: &ScoredInfluencer) -> f64 {
        match self {
            SortKey::Trust => row.trust_index,
            SortKey::Auth => row.authenticity,
            SortKey::Rel => row.relevance,
            SortKey::Res => row.resonance,
            SortKey::Roas => row.expected_roas,
        }
    }

    /// Descending comparator over this key's metric.
    ///
    /// Values that do not compare (NaN) are treated as equal so the stable
    /// sort leaves them in fetch order.
    #[must_use]
    pub fn compare(self, a: &ScoredInfluencer, b: &ScoredInfluencer) -> Ordering {
        self.metric(b)
            .partial_cmp(&self.metric(a))
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trust" => Ok(SortKey::Trust),
            "auth" => Ok(SortKey::Auth),
            "rel" => Ok(SortKey::Rel),
            "res" => Ok(SortKey::Res),
            "roas" => Ok(SortKey::Roas),
            other => Err(CoreError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Returns the records ordered by `key`, highest first.
///
/// The input slice is left untouched; ties keep their fetch order because
/// `sort_by` is stable.
#[must_use]
pub fn sort_report(rows: &[ScoredInfluencer], key: SortKey) -> Vec<&ScoredInfluencer> {
    let mut sorted: Vec<&ScoredInfluencer> = rows.iter().collect();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Validated brief identifier taken from a route or command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BriefId(u64);

impl BriefId {
    #[must_use]
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// Parses an optional raw identifier. `None`, blank, zero, and
    /// non-numeric inputs are all rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBriefId`] when the identifier is unusable.
    pub fn parse_opt(raw: Option<&str>) -> Result<Self, CoreError> {
        raw.ok_or_else(|| CoreError::InvalidBriefId(String::new()))?
            .parse()
    }
}

impl fmt::Display for BriefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BriefId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(BriefId::new)
            .ok_or_else(|| CoreError::InvalidBriefId(s.to_string()))
    }
}
