//! Field-name mapping endpoints
//!
//! POST /api/fields/map, POST /api/fields/lookup

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::AspectError;
use crate::models::{FieldCollision, FieldNameMapping};
use crate::services::{map_name, FieldLookup};
use crate::{ApiResult, AppState};

/// POST /api/fields/map
///
/// **Request:** `{"displayName": "Motor Horsepower"}`
/// **Response:** `{"inlineField": "motorhorsepower", "extensionField": "ebayitemspecificsmotorhorsepower"}`
///
/// A missing or non-string `displayName` is 400.
pub async fn map_field_name(Json(body): Json<Value>) -> ApiResult<Json<FieldNameMapping>> {
    let display_name = body
        .get("displayName")
        .and_then(Value::as_str)
        .ok_or_else(|| AspectError::InvalidArgument("displayName must be a string".to_string()))?;

    Ok(Json(map_name(display_name)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub display_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    /// Display name → inline field, sorted by display name
    pub fields: BTreeMap<String, String>,
    pub collisions: Vec<FieldCollision>,
}

/// POST /api/fields/lookup
///
/// Builds the display-name table for callers translating AI- or
/// UI-originated names. Collisions are reported, not resolved.
pub async fn build_field_lookup(Json(request): Json<LookupRequest>) -> Json<LookupResponse> {
    let lookup = FieldLookup::from_names(request.display_names.iter().map(String::as_str));

    Json(LookupResponse {
        fields: lookup
            .entries()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        collisions: lookup.collisions().to_vec(),
    })
}

/// Build field mapping routes
pub fn field_routes() -> Router<AppState> {
    Router::new()
        .route("/api/fields/map", post(map_field_name))
        .route("/api/fields/lookup", post(build_field_lookup))
}
