//! Normalized coil voltage

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoltageConfidence {
    High,
    Low,
}

/// Canonical voltage for one raw input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVoltage {
    /// Member of the canonical enumeration, or "Other"
    pub standardized: String,
    /// Original input, trimmed
    pub raw: String,
    pub confidence: VoltageConfidence,
}

/// Results of a bulk cleaning pass, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageBatchReport {
    pub results: Vec<NormalizedVoltage>,
    pub high_confidence: usize,
    pub low_confidence: usize,
}
