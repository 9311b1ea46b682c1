//! Listing Scorer
//!
//! Validates a candidate listing's field values against a category aspect
//! schema and computes a 0-100 completeness score.
//!
//! # Matching
//! Field keys are display names, matched case-insensitively. Vocabulary
//! membership is case-insensitive too; the supplied casing is preserved in
//! every reported value.
//!
//! # Tiers
//! - REQUIRED: absent/blank → `missing`; outside vocabulary → `invalid`
//!   and the listing is not valid
//! - RECOMMENDED: absent/blank → `recommended_gaps`; outside vocabulary →
//!   `invalid` (score penalty only, validity unaffected)
//! - OPTIONAL: not checked
//!
//! # Scoring
//! - Required: 60 × met / count (60 when the category has none)
//! - Recommended: 30 × met / count (30 when the category has none)
//! - Validity: max(0, 10 − 2 × invalid)
//!
//! The sum is rounded. Each term is within its weight, so the result is
//! always within 0..=100; it is clamped anyway.

use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    AspectDescriptor, AspectUsage, CategoryAspectSchema, InvalidValue, LengthWarning,
    MissingAspect, MissingReason, ValidationResult,
};

const REQUIRED_WEIGHT: f64 = 60.0;
const RECOMMENDED_WEIGHT: f64 = 30.0;
const VALIDITY_WEIGHT: f64 = 10.0;
const INVALID_PENALTY: f64 = 2.0;

/// Presence of a value for one descriptor
enum Presence<'a> {
    Absent,
    Blank,
    Present(&'a str),
}

/// Per-tier tally
#[derive(Default)]
struct TierOutcome {
    count: usize,
    met: usize,
}

impl TierOutcome {
    fn ratio_score(&self, weight: f64) -> f64 {
        if self.count == 0 {
            weight
        } else {
            weight * self.met as f64 / self.count as f64
        }
    }
}

/// Scores listings against category schemas
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingScorer;

impl ListingScorer {
    pub fn new() -> Self {
        Self
    }

    /// Validate and score `field_values` (display name → value) against `schema`
    ///
    /// Never fails: absent keys are simply missing values. A structurally
    /// bad schema must be rejected before this point
    /// ([`CategoryAspectSchema::check`]).
    pub fn score(
        &self,
        field_values: &HashMap<String, String>,
        schema: &CategoryAspectSchema,
    ) -> ValidationResult {
        let values = lowercase_keys(field_values);

        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        let mut recommended_gaps = Vec::new();
        let mut length_warnings = Vec::new();
        let mut required = TierOutcome::default();
        let mut recommended = TierOutcome::default();

        for descriptor in &schema.descriptors {
            let tier = match descriptor.usage {
                AspectUsage::Required => &mut required,
                AspectUsage::Recommended => &mut recommended,
                AspectUsage::Optional => continue,
            };
            tier.count += 1;

            match presence(&values, descriptor) {
                Presence::Present(value) => {
                    tier.met += 1;
                    if !descriptor.accepts(value) {
                        invalid.push(InvalidValue {
                            descriptor: descriptor.clone(),
                            provided_value: value.to_string(),
                        });
                    }
                    if let Some(warning) = length_warning(descriptor, value) {
                        length_warnings.push(warning);
                    }
                }
                absent_or_blank => {
                    if descriptor.usage == AspectUsage::Required {
                        let reason = match absent_or_blank {
                            Presence::Blank => MissingReason::Blank,
                            _ => MissingReason::Absent,
                        };
                        missing.push(MissingAspect {
                            descriptor: descriptor.clone(),
                            reason,
                        });
                    } else {
                        recommended_gaps.push(descriptor.clone());
                    }
                }
            }
        }

        let required_score = required.ratio_score(REQUIRED_WEIGHT);
        let recommended_score = recommended.ratio_score(RECOMMENDED_WEIGHT);
        let validity_score = (VALIDITY_WEIGHT - INVALID_PENALTY * invalid.len() as f64).max(0.0);
        let score = (required_score + recommended_score + validity_score)
            .round()
            .clamp(0.0, 100.0) as u8;

        let is_valid = missing.is_empty()
            && !invalid
                .iter()
                .any(|i| i.descriptor.usage == AspectUsage::Required);

        debug!(
            category_id = %schema.category_id,
            score,
            is_valid,
            required_met = required.met,
            required_count = required.count,
            recommended_met = recommended.met,
            recommended_count = recommended.count,
            invalid = invalid.len(),
            "Listing scored"
        );

        ValidationResult {
            is_valid,
            score,
            missing,
            invalid,
            recommended_gaps,
            length_warnings,
            required_met: required.met,
            required_count: required.count,
            recommended_met: recommended.met,
            recommended_count: recommended.count,
        }
    }
}

/// Lowercase keys; on a case-only clash the first non-blank value in key
/// order wins
fn lowercase_keys(field_values: &HashMap<String, String>) -> HashMap<String, &str> {
    let mut keys: Vec<&String> = field_values.keys().collect();
    keys.sort();

    let mut out: HashMap<String, &str> = HashMap::with_capacity(keys.len());
    for key in keys {
        let value = field_values[key].as_str();
        let slot = out.entry(key.to_lowercase()).or_insert(value);
        if slot.trim().is_empty() && !value.trim().is_empty() {
            *slot = value;
        }
    }
    out
}

fn presence<'a>(values: &HashMap<String, &'a str>, descriptor: &AspectDescriptor) -> Presence<'a> {
    match values.get(&descriptor.display_name.to_lowercase()) {
        None => Presence::Absent,
        Some(value) if value.trim().is_empty() => Presence::Blank,
        Some(value) => Presence::Present(value),
    }
}

fn length_warning(descriptor: &AspectDescriptor, value: &str) -> Option<LengthWarning> {
    let max_length = descriptor.max_length?;
    let provided_length = value.chars().count();
    (provided_length > max_length as usize).then(|| LengthWarning {
        descriptor: descriptor.clone(),
        provided_length,
        max_length,
    })
}
