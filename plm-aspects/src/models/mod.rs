//! Data models for plm-aspects
//!
//! - Category aspect schema and its descriptors
//! - Field-name mapping records
//! - Listing validation output
//! - Normalized coil voltage

pub mod aspect;
pub mod field;
pub mod validation;
pub mod voltage;

pub use aspect::{AspectDescriptor, AspectUsage, CategoryAspectSchema, InputMode, TruncationPolicy};
pub use field::{FieldCollision, FieldNameMapping, FormField};
pub use validation::{InvalidValue, LengthWarning, MissingAspect, MissingReason, ValidationResult};
pub use voltage::{NormalizedVoltage, VoltageBatchReport, VoltageConfidence};
