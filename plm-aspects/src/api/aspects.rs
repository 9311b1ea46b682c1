//! Category aspect endpoints
//!
//! GET /api/aspects/:category_id, GET /api/cache/stats

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::check_category_id;
use crate::models::{AspectUsage, CategoryAspectSchema, FieldCollision, FormField};
use crate::services::{build_lookup, form_fields, CacheStats};
use crate::{ApiResult, AppState};

/// Query flags for GET /api/aspects/:category_id
#[derive(Debug, Default, Deserialize)]
pub struct AspectQuery {
    /// Return every allowed value instead of the capped view
    #[serde(default)]
    pub full: bool,
    /// Refetch even when the cached schema is fresh
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectsResponse {
    pub schema: CategoryAspectSchema,
    pub required_count: usize,
    pub recommended_count: usize,
    pub optional_count: usize,
    /// Machine field names per descriptor, for form construction
    pub fields: Vec<FormField>,
    pub collisions: Vec<FieldCollision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// GET /api/aspects/:category_id
pub async fn get_aspects(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(query): Query<AspectQuery>,
) -> ApiResult<Json<AspectsResponse>> {
    check_category_id(&category_id)?;

    let cached = state.aspects.get_schema(&category_id, query.refresh).await?;
    let schema = if query.full {
        cached.as_ref().clone()
    } else {
        cached.truncated(&state.truncation)
    };

    let warning = schema.is_empty().then(|| {
        format!(
            "Category {} has no aspects; it may be a non-leaf category or a mistyped id",
            category_id
        )
    });

    let lookup = build_lookup(&schema.descriptors);

    Ok(Json(AspectsResponse {
        required_count: schema.by_usage(AspectUsage::Required).count(),
        recommended_count: schema.by_usage(AspectUsage::Recommended).count(),
        optional_count: schema.by_usage(AspectUsage::Optional).count(),
        fields: form_fields(&schema),
        collisions: lookup.collisions().to_vec(),
        warning,
        schema,
    }))
}

/// GET /api/cache/stats
pub async fn get_cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.aspects.cache().stats().await)
}

/// Build aspect routes
pub fn aspect_routes() -> Router<AppState> {
    Router::new()
        .route("/api/aspects/:category_id", get(get_aspects))
        .route("/api/cache/stats", get(get_cache_stats))
}
