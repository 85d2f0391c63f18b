//! Influencer records and handle list parsing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PLATFORM: &str = "instagram";

/// An influencer as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Influencer {
    pub id: i64,
    pub handle: String,
    pub platform: String,
}

/// One element of the `POST /influencers` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfluencerInput {
    pub handle: String,
    pub platform: String,
}

impl InfluencerInput {
    #[must_use]
    pub fn new(handle: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            platform: platform.into(),
        }
    }
}

/// Splits free-form handle input on commas and whitespace.
///
/// Each handle loses one leading `@` and is lowercased; empties are dropped
/// and duplicates keep only their first occurrence.
#[must_use]
pub fn parse_handles(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| h.strip_prefix('@').unwrap_or(h).to_lowercase())
        .filter(|h| !h.is_empty() && seen.insert(h.clone()))
        .collect()
}
