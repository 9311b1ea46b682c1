//! Listing validation output
//!
//! Transient: computed per request and never persisted.

use serde::{Deserialize, Serialize};

use super::aspect::AspectDescriptor;

/// Why a required aspect counts as missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingReason {
    /// No value supplied under the display name
    Absent,
    /// Value supplied but empty after trimming
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingAspect {
    pub descriptor: AspectDescriptor,
    pub reason: MissingReason,
}

/// A present value outside the descriptor's closed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidValue {
    pub descriptor: AspectDescriptor,
    /// As supplied, original casing preserved
    pub provided_value: String,
}

/// A present value longer than the descriptor's max length (advisory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthWarning {
    pub descriptor: AspectDescriptor,
    pub provided_length: usize,
    pub max_length: u32,
}

/// Result of scoring one listing against one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Completeness score, 0..=100
    pub score: u8,
    pub missing: Vec<MissingAspect>,
    pub invalid: Vec<InvalidValue>,
    pub recommended_gaps: Vec<AspectDescriptor>,
    pub length_warnings: Vec<LengthWarning>,
    pub required_met: usize,
    pub required_count: usize,
    pub recommended_met: usize,
    pub recommended_count: usize,
}
