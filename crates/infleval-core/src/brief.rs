//! Campaign briefs and the shaping of brief form input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A brief as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    pub id: i64,
    pub brand: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub kpi_weights: BTreeMap<String, f64>,
}

/// KPI weights sent with a new brief. Each weight lives in `[0, 1]`; the sum
/// is free because the backend normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiWeights {
    pub authenticity: f64,
    pub relevance: f64,
    pub resonance: f64,
    /// Weight the backend applies to expected ROAS.
    #[serde(rename = "return")]
    pub return_: f64,
}

impl Default for KpiWeights {
    fn default() -> Self {
        Self {
            authenticity: 0.25,
            relevance: 0.25,
            resonance: 0.25,
            return_: 0.25,
        }
    }
}

impl KpiWeights {
    pub const NAMES: [&'static str; 4] = ["authenticity", "relevance", "resonance", "return"];

    /// Clamps a raw weight into `[0, 1]`; non-finite input becomes 0.
    #[must_use]
    pub fn clamp(value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Sets one weight by its wire name, clamping the value.
    ///
    /// Returns `false` when `name` is not a known KPI.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let value = Self::clamp(value);
        match name.trim().to_ascii_lowercase().as_str() {
            "authenticity" => self.authenticity = value,
            "relevance" => self.relevance = value,
            "resonance" => self.resonance = value,
            "return" | "roas" => self.return_ = value,
            _ => return false,
        }
        true
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.authenticity + self.relevance + self.resonance + self.return_
    }
}

/// Payload for `POST /brief`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BriefInput {
    pub brand: String,
    pub keywords: Vec<String>,
    pub kpi_weights: KpiWeights,
}

impl BriefInput {
    /// Builds a payload from raw form values. The brand is trimmed and must
    /// not be empty; keywords are comma separated.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyBrand`] when the trimmed brand is empty.
    pub fn new(brand: &str, keywords: &str, kpi_weights: KpiWeights) -> Result<Self, CoreError> {
        let brand = brand.trim();
        if brand.is_empty() {
            return Err(CoreError::EmptyBrand);
        }
        Ok(Self {
            brand: brand.to_string(),
            keywords: split_keywords(keywords),
            kpi_weights,
        })
    }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToString::to_string)
        .collect()
}
