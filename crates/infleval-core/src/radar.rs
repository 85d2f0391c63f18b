//! Radar-chart data shaping for a single scored record.
//!
//! Two record shapes reach the chart: the legacy three-metric score block and
//! the full report row, which adds ROAS and trust. Both deserialize into
//! [`RadarInput`].

use serde::{Deserialize, Deserializer};

use crate::report::ScoredInfluencer;

/// Upper bound of the chart's radial axis.
pub const RADAR_DOMAIN_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadarAxis {
    Authenticity,
    Relevance,
    Resonance,
    Roas,
    Trust,
}

impl RadarAxis {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RadarAxis::Authenticity => "Authenticity",
            RadarAxis::Relevance => "Relevance",
            RadarAxis::Resonance => "Resonance",
            RadarAxis::Roas => "ROAS",
            RadarAxis::Trust => "Trust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarPoint {
    pub axis: RadarAxis,
    pub value: f64,
}

/// Possibly partial metric set. Fields that are missing, `null`, or not
/// numbers are held as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RadarInput {
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub authenticity: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub relevance: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub resonance: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub expected_roas: Option<f64>,
    #[serde(default, deserialize_with = "numeric_or_none")]
    pub trust_index: Option<f64>,
}

impl RadarInput {
    /// Legacy three-metric shape.
    #[must_use]
    pub fn scores(authenticity: f64, relevance: f64, resonance: f64) -> Self {
        Self {
            authenticity: Some(authenticity),
            relevance: Some(relevance),
            resonance: Some(resonance),
            ..Self::default()
        }
    }

    /// Combines a full row with a legacy score block. The row's base metrics
    /// win where present; ROAS and trust only ever come from the row.
    #[must_use]
    pub fn merge(row: Option<RadarInput>, legacy: Option<RadarInput>) -> Self {
        let row = row.unwrap_or_default();
        let legacy = legacy.unwrap_or_default();
        Self {
            authenticity: row.authenticity.or(legacy.authenticity),
            relevance: row.relevance.or(legacy.relevance),
            resonance: row.resonance.or(legacy.resonance),
            expected_roas: row.expected_roas,
            trust_index: row.trust_index,
        }
    }
}

impl From<&ScoredInfluencer> for RadarInput {
    fn from(row: &ScoredInfluencer) -> Self {
        Self {
            authenticity: Some(row.authenticity),
            relevance: Some(row.relevance),
            resonance: Some(row.resonance),
            expected_roas: Some(row.expected_roas),
            trust_index: Some(row.trust_index),
        }
    }
}

/// Projects a record onto the chart axes in fixed order: the three base
/// metrics always (missing ones as 0), then ROAS and trust when present.
#[must_use]
pub fn radar_points(input: &RadarInput) -> Vec<RadarPoint> {
    let mut points = vec![
        RadarPoint {
            axis: RadarAxis::Authenticity,
            value: input.authenticity.unwrap_or(0.0),
        },
        RadarPoint {
            axis: RadarAxis::Relevance,
            value: input.relevance.unwrap_or(0.0),
        },
        RadarPoint {
            axis: RadarAxis::Resonance,
            value: input.resonance.unwrap_or(0.0),
        },
    ];
    if let Some(value) = input.expected_roas {
        points.push(RadarPoint {
            axis: RadarAxis::Roas,
            value,
        });
    }
    if let Some(value) = input.trust_index {
        points.push(RadarPoint {
            axis: RadarAxis::Trust,
            value,
        });
    }
    points
}

fn numeric_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
