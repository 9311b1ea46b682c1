//! Display name → inventory-platform field name mapping
//!
//! The inventory platform's write API takes form keys in a lowercase
//! alphanumeric convention. Every aspect has two keys:
//! - inline field: `"Motor Horsepower"` → `"motorhorsepower"`
//! - extension field: `"ebayitemspecifics"` + inline field
//!
//! Distinct display names can collapse to the same key ("Coil-Voltage" and
//! "Coil Voltage"). The lookup table keeps the last one written and reports
//! the collision instead of resolving it.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{AspectDescriptor, CategoryAspectSchema, FieldCollision, FieldNameMapping, FormField};

/// Namespace prefix of extension fields
pub const EXTENSION_PREFIX: &str = "ebayitemspecifics";

/// Lowercase `display_name` and drop everything outside `[a-z0-9]`
pub fn inline_field(display_name: &str) -> String {
    display_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Both machine field names for `display_name`
pub fn map_name(display_name: &str) -> FieldNameMapping {
    let inline = inline_field(display_name);
    FieldNameMapping {
        extension_field: format!("{}{}", EXTENSION_PREFIX, inline),
        inline_field: inline,
    }
}

/// Display name → inline field table, with collisions reported
#[derive(Debug, Clone, Default)]
pub struct FieldLookup {
    by_display_name: HashMap<String, String>,
    collisions: Vec<FieldCollision>,
}

impl FieldLookup {
    /// Build from any sequence of display names
    ///
    /// Duplicate display names overwrite (last write wins).
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut by_display_name = HashMap::new();
        // inline field -> distinct display names in first-seen order
        let mut owners: Vec<(String, Vec<String>)> = Vec::new();

        for name in names {
            let inline = inline_field(name);
            by_display_name.insert(name.to_string(), inline.clone());

            match owners.iter_mut().find(|(field, _)| *field == inline) {
                Some((_, names)) => {
                    // Keep the list in write order so the last entry is the owner
                    names.retain(|existing| existing != name);
                    names.push(name.to_string());
                }
                None => owners.push((inline, vec![name.to_string()])),
            }
        }

        let collisions: Vec<FieldCollision> = owners
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(inline_field, display_names)| FieldCollision {
                inline_field,
                display_names,
            })
            .collect();

        for collision in &collisions {
            warn!(
                inline_field = %collision.inline_field,
                display_names = ?collision.display_names,
                "Distinct display names map to the same field"
            );
        }

        Self {
            by_display_name,
            collisions,
        }
    }

    /// Inline field for an exact display name
    pub fn get(&self, display_name: &str) -> Option<&str> {
        self.by_display_name.get(display_name).map(String::as_str)
    }

    /// Translate an AI- or UI-originated name into a platform field
    ///
    /// Exact display names use the table; a name that is already an inline
    /// field of this table is returned as is; anything else is mapped
    /// directly.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(field) = self.get(name) {
            return field.to_string();
        }
        if self.by_display_name.values().any(|field| field == name) {
            return name.to_string();
        }
        inline_field(name)
    }

    pub fn entries(&self) -> &HashMap<String, String> {
        &self.by_display_name
    }

    pub fn collisions(&self) -> &[FieldCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.by_display_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_display_name.is_empty()
    }
}

/// Lookup table over a descriptor list
pub fn build_lookup(descriptors: &[AspectDescriptor]) -> FieldLookup {
    FieldLookup::from_names(descriptors.iter().map(|d| d.display_name.as_str()))
}

/// Form inputs for every descriptor of `schema`, in schema order
pub fn form_fields(schema: &CategoryAspectSchema) -> Vec<FormField> {
    schema
        .descriptors
        .iter()
        .map(|descriptor| {
            let mapping = map_name(&descriptor.display_name);
            FormField {
                display_name: descriptor.display_name.clone(),
                usage: descriptor.usage,
                inline_field: mapping.inline_field,
                extension_field: mapping.extension_field,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectUsage;

    #[test]
    fn test_map_motor_horsepower() {
        let mapping = map_name("Motor Horsepower");
        assert_eq!(mapping.inline_field, "motorhorsepower");
        assert_eq!(mapping.extension_field, "ebayitemspecificsmotorhorsepower");
    }

    #[test]
    fn test_strips_punctuation_and_keeps_digits() {
        assert_eq!(inline_field("Coil Voltage (VAC)"), "coilvoltagevac");
        assert_eq!(inline_field("Number of Poles/Phases"), "numberofpolesphases");
        assert_eq!(inline_field("NEMA 4X Rating"), "nema4xrating");
        assert_eq!(inline_field("Größe"), "gre");
        assert_eq!(inline_field(""), "");
    }

    #[test]
    fn test_mapping_is_pure() {
        assert_eq!(map_name("Brand"), map_name("Brand"));
    }

    #[test]
    fn test_lookup_reports_collisions_last_write_wins() {
        let lookup = FieldLookup::from_names(["Coil Voltage", "Brand", "Coil-Voltage"]);

        assert_eq!(lookup.get("Coil Voltage"), Some("coilvoltage"));
        assert_eq!(lookup.get("Coil-Voltage"), Some("coilvoltage"));
        assert_eq!(lookup.len(), 3);

        let collisions = lookup.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].inline_field, "coilvoltage");
        assert_eq!(collisions[0].display_names, vec!["Coil Voltage", "Coil-Voltage"]);
    }

    #[test]
    fn test_duplicate_display_name_is_not_a_collision() {
        let lookup = FieldLookup::from_names(["Brand", "Brand"]);
        assert_eq!(lookup.len(), 1);
        assert!(lookup.collisions().is_empty());
    }

    #[test]
    fn test_resolve() {
        let lookup = FieldLookup::from_names(["Motor Horsepower"]);
        assert_eq!(lookup.resolve("Motor Horsepower"), "motorhorsepower");
        assert_eq!(lookup.resolve("motorhorsepower"), "motorhorsepower");
        assert_eq!(lookup.resolve("Frame Size"), "framesize");
    }

    #[test]
    fn test_form_fields_follow_schema_order() {
        let schema = CategoryAspectSchema::new(
            "1",
            chrono::Utc::now(),
            vec![
                AspectDescriptor::new("Brand", AspectUsage::Required),
                AspectDescriptor::new("Enclosure Type", AspectUsage::Optional),
            ],
        );

        let fields = form_fields(&schema);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].inline_field, "enclosuretype");
        assert_eq!(fields[1].extension_field, "ebayitemspecificsenclosuretype");
        assert_eq!(fields[1].usage, AspectUsage::Optional);
    }
}
