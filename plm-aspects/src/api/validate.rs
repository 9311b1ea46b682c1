//! Listing validation endpoint
//!
//! POST /api/validate

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::check_category_id;
use crate::error::AspectError;
use crate::models::{CategoryAspectSchema, ValidationResult};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/validate request
///
/// Either `categoryId` (schema fetched through the cache, full vocabulary)
/// or an explicit `schema`. `schema` wins when both are given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub category_id: Option<String>,
    pub schema: Option<Value>,
    #[serde(default)]
    pub field_values: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub category_id: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Flatten JSON field values to strings
///
/// Strings pass through, numbers and booleans are rendered; null, arrays
/// and objects count as absent.
fn flatten_field_values(values: HashMap<String, Value>) -> HashMap<String, String> {
    values
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Bool(b) => Some((key, b.to_string())),
            other => {
                debug!(field = %key, kind = ?other, "Ignoring non-scalar field value");
                None
            }
        })
        .collect()
}

fn parse_schema(value: Value) -> Result<CategoryAspectSchema, AspectError> {
    if !value.is_object() {
        return Err(AspectError::InvalidArgument("schema must be an object".to_string()));
    }
    let schema: CategoryAspectSchema = serde_json::from_value(value)
        .map_err(|e| AspectError::InvalidArgument(format!("malformed schema: {}", e)))?;
    schema.check()?;
    Ok(schema)
}

/// POST /api/validate
pub async fn validate_listing(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> ApiResult<Json<ValidateResponse>> {
    let schema: Arc<CategoryAspectSchema> = match (request.schema, request.category_id) {
        (Some(schema), _) => Arc::new(parse_schema(schema)?),
        (None, Some(category_id)) => {
            check_category_id(&category_id)?;
            state.aspects.get_schema(&category_id, false).await?
        }
        (None, None) => {
            return Err(ApiError::BadRequest(
                "Either categoryId or schema is required".to_string(),
            ))
        }
    };

    let field_values = flatten_field_values(request.field_values);
    let result = state.scorer.score(&field_values, &schema);

    Ok(Json(ValidateResponse {
        category_id: schema.category_id.clone(),
        result,
    }))
}

/// Build validation routes
pub fn validate_routes() -> Router<AppState> {
    Router::new().route("/api/validate", post(validate_listing))
}
