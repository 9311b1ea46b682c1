//! Coil voltage normalization endpoints
//!
//! POST /api/voltage/normalize, POST /api/voltage/batch
//!
//! Any JSON value is accepted; non-strings normalize to Other/low rather
//! than failing the request.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{NormalizedVoltage, VoltageBatchReport};
use crate::services::voltage_normalizer;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub values: Vec<Value>,
}

/// POST /api/voltage/normalize
pub async fn normalize_voltage(Json(request): Json<NormalizeRequest>) -> Json<NormalizedVoltage> {
    Json(voltage_normalizer::normalize_value(&request.value))
}

/// POST /api/voltage/batch
pub async fn normalize_voltage_batch(Json(request): Json<BatchRequest>) -> Json<VoltageBatchReport> {
    let report = voltage_normalizer::normalize_batch(request.values.iter().map(Value::as_str));

    tracing::info!(
        total = report.results.len(),
        high = report.high_confidence,
        low = report.low_confidence,
        "Voltage batch normalized"
    );

    Json(report)
}

/// Build voltage routes
pub fn voltage_routes() -> Router<AppState> {
    Router::new()
        .route("/api/voltage/normalize", post(normalize_voltage))
        .route("/api/voltage/batch", post(normalize_voltage_batch))
}
