//! Category aspect schema
//!
//! A [`CategoryAspectSchema`] is the canonical form of one marketplace
//! category's field requirements. Schemas are immutable once built; a
//! refetch produces a new schema rather than mutating the old one.
//!
//! The required / recommended / optional partitions are filtered views over
//! `descriptors`, never stored separately.

use chrono::{DateTime, Utc};
use plm_common::config::TruncationConfig;
use serde::{Deserialize, Serialize};

use crate::error::AspectError;

/// Usage tier of an aspect within a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AspectUsage {
    Required,
    Recommended,
    Optional,
}

impl AspectUsage {
    /// Parse the provider's usage string, case-insensitively
    ///
    /// Absent or unrecognized values are OPTIONAL.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("REQUIRED") => Self::Required,
            Some("RECOMMENDED") => Self::Recommended,
            _ => Self::Optional,
        }
    }
}

/// How a value for the aspect may be entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    #[default]
    FreeText,
    SelectionOnly,
}

impl InputMode {
    /// Parse the provider's mode string; absent or unrecognized is FREE_TEXT
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("SELECTION_ONLY") => Self::SelectionOnly,
            _ => Self::FreeText,
        }
    }
}

fn default_data_type() -> String {
    "STRING".to_string()
}

/// One field requirement for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectDescriptor {
    /// Marketplace's human label, e.g. "Motor Horsepower"
    pub display_name: String,
    pub usage: AspectUsage,
    #[serde(default)]
    pub input_mode: InputMode,
    /// Advisory only ("STRING", "NUMBER", ...)
    #[serde(default = "default_data_type")]
    pub data_type: String,
    /// Closed vocabulary in provider order; empty means unconstrained
    #[serde(default)]
    pub allowed_values: Vec<String>,
    #[serde(default)]
    pub multi_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Set when `allowed_values` was capped for presentation and is incomplete
    #[serde(default)]
    pub values_truncated: bool,
    /// Vocabulary size before any cap
    #[serde(default)]
    pub total_values: usize,
}

impl AspectDescriptor {
    /// Free-text descriptor with no vocabulary
    pub fn new(display_name: impl Into<String>, usage: AspectUsage) -> Self {
        Self {
            display_name: display_name.into(),
            usage,
            input_mode: InputMode::FreeText,
            data_type: default_data_type(),
            allowed_values: Vec::new(),
            multi_value: false,
            max_length: None,
            values_truncated: false,
            total_values: 0,
        }
    }

    /// Builder-style helper attaching a closed vocabulary
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self.total_values = self.allowed_values.len();
        self
    }

    /// True when values are restricted to `allowed_values`
    pub fn is_constrained(&self) -> bool {
        !self.allowed_values.is_empty()
    }

    /// Case-insensitive membership test against the vocabulary
    ///
    /// Unconstrained descriptors accept every value.
    pub fn accepts(&self, value: &str) -> bool {
        if !self.is_constrained() {
            return true;
        }
        let needle = value.trim().to_lowercase();
        self.allowed_values
            .iter()
            .any(|allowed| allowed.trim().to_lowercase() == needle)
    }
}

/// Allowed-value caps for a presentation view of a schema
///
/// Truncation is lossy: a truncated schema cannot be used to decide whether
/// a value is outside the vocabulary. `None` means no cap for that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationPolicy {
    /// Cap for REQUIRED and RECOMMENDED descriptors
    pub primary_cap: Option<usize>,
    /// Cap for OPTIONAL descriptors
    pub optional_cap: Option<usize>,
}

impl TruncationPolicy {
    /// Full-fidelity view
    pub const fn untruncated() -> Self {
        Self {
            primary_cap: None,
            optional_cap: None,
        }
    }

    pub const fn capped(primary_cap: usize, optional_cap: usize) -> Self {
        Self {
            primary_cap: Some(primary_cap),
            optional_cap: Some(optional_cap),
        }
    }

    pub fn cap_for(&self, usage: AspectUsage) -> Option<usize> {
        match usage {
            AspectUsage::Required | AspectUsage::Recommended => self.primary_cap,
            AspectUsage::Optional => self.optional_cap,
        }
    }
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        let config = TruncationConfig::default();
        Self::capped(config.primary_cap, config.optional_cap)
    }
}

impl From<&TruncationConfig> for TruncationPolicy {
    fn from(config: &TruncationConfig) -> Self {
        Self::capped(config.primary_cap, config.optional_cap)
    }
}

/// Full set of aspect descriptors for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAspectSchema {
    pub category_id: String,
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default)]
    pub descriptors: Vec<AspectDescriptor>,
}

impl CategoryAspectSchema {
    pub fn new(
        category_id: impl Into<String>,
        fetched_at: DateTime<Utc>,
        descriptors: Vec<AspectDescriptor>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            fetched_at,
            descriptors,
        }
    }

    /// Descriptors with the given usage tier, in schema order
    pub fn by_usage(&self, usage: AspectUsage) -> impl Iterator<Item = &AspectDescriptor> {
        self.descriptors.iter().filter(move |d| d.usage == usage)
    }

    pub fn required(&self) -> impl Iterator<Item = &AspectDescriptor> {
        self.by_usage(AspectUsage::Required)
    }

    pub fn recommended(&self) -> impl Iterator<Item = &AspectDescriptor> {
        self.by_usage(AspectUsage::Recommended)
    }

    pub fn optional(&self) -> impl Iterator<Item = &AspectDescriptor> {
        self.by_usage(AspectUsage::Optional)
    }

    /// True when the category has no aspects (non-leaf or mistyped id)
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Presentation copy with allowed-value lists capped per `policy`
    ///
    /// Descriptors whose list was cut are flagged `values_truncated`.
    pub fn truncated(&self, policy: &TruncationPolicy) -> Self {
        let descriptors = self
            .descriptors
            .iter()
            .map(|descriptor| {
                let mut descriptor = descriptor.clone();
                descriptor.total_values = descriptor.total_values.max(descriptor.allowed_values.len());
                if let Some(cap) = policy.cap_for(descriptor.usage) {
                    if descriptor.allowed_values.len() > cap {
                        descriptor.allowed_values.truncate(cap);
                        descriptor.values_truncated = true;
                    }
                }
                descriptor
            })
            .collect();

        Self {
            category_id: self.category_id.clone(),
            fetched_at: self.fetched_at,
            descriptors,
        }
    }

    /// Structural check for schemas that did not come from the normalizer
    ///
    /// Rejects blank display names and SELECTION_ONLY descriptors without a
    /// vocabulary.
    pub fn check(&self) -> Result<(), AspectError> {
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if descriptor.display_name.trim().is_empty() {
                return Err(AspectError::InvalidArgument(format!(
                    "descriptor {} has a blank displayName",
                    index
                )));
            }
            if descriptor.input_mode == InputMode::SelectionOnly && !descriptor.is_constrained() {
                return Err(AspectError::InvalidArgument(format!(
                    "descriptor '{}' is SELECTION_ONLY but has no allowedValues",
                    descriptor.display_name
                )));
            }
        }
        Ok(())
    }
}
