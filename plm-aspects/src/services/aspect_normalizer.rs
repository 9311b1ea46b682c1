//! Aspect schema normalizer
//!
//! Converts the taxonomy provider's raw aspect list into a
//! [`CategoryAspectSchema`].
//!
//! # Derivation rules
//! - usage: `aspectUsage`, OPTIONAL when absent; `aspectRequired: true`
//!   promotes to REQUIRED
//! - input mode: `aspectMode`, FREE_TEXT when absent
//! - multi-value: `itemToAspectCardinality == "MULTI"`
//! - allowed values: capped per usage tier by the normalizer's
//!   [`TruncationPolicy`]. Capping is lossy; the validator needs a schema
//!   built with [`TruncationPolicy::untruncated`].
//!
//! A category with zero aspects (non-leaf or mistyped id) is not an error:
//! the schema simply has no descriptors.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::taxonomy_client::{RawAspect, RawAspectResponse, TaxonomyProvider};
use crate::error::AspectError;
use crate::models::{AspectDescriptor, AspectUsage, CategoryAspectSchema, InputMode, TruncationPolicy};

/// Raw-to-canonical schema converter
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectNormalizer {
    policy: TruncationPolicy,
}

impl AspectNormalizer {
    pub fn new(policy: TruncationPolicy) -> Self {
        Self { policy }
    }

    /// Normalizer that keeps every allowed value
    pub fn untruncated() -> Self {
        Self::new(TruncationPolicy::untruncated())
    }

    pub fn policy(&self) -> &TruncationPolicy {
        &self.policy
    }

    /// Normalize a raw response, stamping it with the current time
    pub fn normalize(&self, raw: &RawAspectResponse, category_id: &str) -> CategoryAspectSchema {
        self.normalize_at(raw, category_id, Utc::now())
    }

    pub fn normalize_at(
        &self,
        raw: &RawAspectResponse,
        category_id: &str,
        fetched_at: DateTime<Utc>,
    ) -> CategoryAspectSchema {
        let descriptors: Vec<AspectDescriptor> = raw
            .aspects
            .iter()
            .filter_map(|aspect| self.descriptor_from(aspect))
            .collect();

        if descriptors.is_empty() {
            warn!(
                category_id = %category_id,
                "Category has no aspects (non-leaf or mistyped category id?)"
            );
        } else {
            debug!(
                category_id = %category_id,
                descriptors = descriptors.len(),
                "Normalized category aspects"
            );
        }

        CategoryAspectSchema::new(category_id, fetched_at, descriptors)
    }

    /// Fetch from `provider` and normalize
    ///
    /// Upstream failures propagate unchanged; there is no retry here.
    pub async fn fetch_schema(
        &self,
        provider: &dyn TaxonomyProvider,
        category_id: &str,
    ) -> Result<CategoryAspectSchema, AspectError> {
        let raw = provider.fetch_item_aspects(category_id).await?;
        Ok(self.normalize(&raw, category_id))
    }

    fn descriptor_from(&self, aspect: &RawAspect) -> Option<AspectDescriptor> {
        let display_name = aspect.localized_aspect_name.trim();
        if display_name.is_empty() {
            debug!("Skipping aspect with blank name");
            return None;
        }

        let constraint = aspect.aspect_constraint.clone().unwrap_or_default();

        let usage = if constraint.aspect_required == Some(true) {
            AspectUsage::Required
        } else {
            AspectUsage::from_wire(constraint.aspect_usage.as_deref())
        };

        let mut allowed_values: Vec<String> = aspect
            .aspect_values
            .iter()
            .flatten()
            .map(|v| v.localized_value.clone())
            .filter(|v| !v.trim().is_empty())
            .collect();

        let total_values = allowed_values.len();
        let mut values_truncated = false;
        if let Some(cap) = self.policy.cap_for(usage) {
            if allowed_values.len() > cap {
                allowed_values.truncate(cap);
                values_truncated = true;
            }
        }

        let mut input_mode = InputMode::from_wire(constraint.aspect_mode.as_deref());
        if input_mode == InputMode::SelectionOnly && allowed_values.is_empty() {
            debug!(
                aspect = %display_name,
                "SELECTION_ONLY aspect without values, treating as FREE_TEXT"
            );
            input_mode = InputMode::FreeText;
        }

        let multi_value = constraint
            .item_to_aspect_cardinality
            .as_deref()
            .map(|c| c.trim().eq_ignore_ascii_case("MULTI"))
            .unwrap_or(false);

        Some(AspectDescriptor {
            display_name: display_name.to_string(),
            usage,
            input_mode,
            data_type: constraint
                .aspect_data_type
                .unwrap_or_else(|| "STRING".to_string()),
            allowed_values,
            multi_value,
            max_length: constraint.aspect_max_length,
            values_truncated,
            total_values,
        })
    }
}
