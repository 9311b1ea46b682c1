//! Machine field-name records for the inventory platform

use serde::{Deserialize, Serialize};

use super::aspect::AspectUsage;

/// The two inventory-platform field names derived from one display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNameMapping {
    /// Lowercase alphanumeric collapse of the display name ("motorhorsepower")
    pub inline_field: String,
    /// Namespace prefix + inline field ("ebayitemspecificsmotorhorsepower")
    pub extension_field: String,
}

/// Distinct display names that collapse to the same inline field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCollision {
    pub inline_field: String,
    /// In input order; the last one owns the field
    pub display_names: Vec<String>,
}

/// One form input for a schema descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub display_name: String,
    pub usage: AspectUsage,
    pub inline_field: String,
    pub extension_field: String,
}
