//! HTTP API handlers for plm-aspects
//!
//! JSON in and out, camelCase field names. Errors render as
//! `{ "error": { "code", "message", "upstreamStatus" } }`.

pub mod aspects;
pub mod fields;
pub mod health;
pub mod validate;
pub mod voltage;

pub use aspects::aspect_routes;
pub use fields::field_routes;
pub use health::health_routes;
pub use validate::validate_routes;
pub use voltage::voltage_routes;

use crate::ApiError;

/// Category ids are non-empty ASCII digit strings
pub(crate) fn check_category_id(category_id: &str) -> Result<(), ApiError> {
    if category_id.is_empty() || !category_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::BadRequest(format!(
            "Invalid category id '{}': expected digits only",
            category_id
        )));
    }
    Ok(())
}
