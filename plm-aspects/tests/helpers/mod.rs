//! Test Helper Utilities
//!
//! Shared fixtures for plm-aspects integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use plm_aspects::error::AspectError;
use plm_aspects::models::TruncationPolicy;
use plm_aspects::services::{
    RawAspect, RawAspectConstraint, RawAspectResponse, RawAspectValue, TaxonomyProvider,
};
use plm_aspects::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Raw aspect entry in the provider's wire shape
pub fn raw_aspect(name: &str, usage: &str, values: &[&str]) -> RawAspect {
    RawAspect {
        localized_aspect_name: name.to_string(),
        aspect_constraint: Some(RawAspectConstraint {
            aspect_usage: Some(usage.to_string()),
            aspect_mode: Some(if values.is_empty() { "FREE_TEXT" } else { "SELECTION_ONLY" }.to_string()),
            aspect_data_type: Some("STRING".to_string()),
            item_to_aspect_cardinality: Some("SINGLE".to_string()),
            ..RawAspectConstraint::default()
        }),
        aspect_values: Some(
            values
                .iter()
                .map(|v| RawAspectValue {
                    localized_value: v.to_string(),
                })
                .collect(),
        ),
    }
}

/// Brand + MPN required, Coil Voltage recommended with a 30-value vocabulary
pub fn contactor_aspects() -> RawAspectResponse {
    let mut voltages: Vec<String> = vec!["24 V DC".to_string(), "120 V AC".to_string()];
    voltages.extend((0..28).map(|i| format!("{} V", 200 + i)));
    let voltage_refs: Vec<&str> = voltages.iter().map(String::as_str).collect();

    RawAspectResponse {
        aspects: vec![
            raw_aspect("Brand", "REQUIRED", &[]),
            raw_aspect("MPN", "REQUIRED", &[]),
            raw_aspect("Coil Voltage", "RECOMMENDED", &voltage_refs),
            raw_aspect("Country/Region of Manufacture", "OPTIONAL", &[]),
        ],
    }
}

/// In-memory provider counting upstream calls
pub struct FakeProvider {
    responses: HashMap<String, RawAspectResponse>,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_category(mut self, category_id: &str, response: RawAspectResponse) -> Self {
        self.responses.insert(category_id.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaxonomyProvider for FakeProvider {
    async fn fetch_item_aspects(&self, category_id: &str) -> Result<RawAspectResponse, AspectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(category_id)
            .cloned()
            .ok_or_else(|| AspectError::fetch(Some(404), format!("category {} not found", category_id)))
    }
}

/// Router over `provider` with a 24h cache and caps of 10 / 5
pub fn create_test_app(provider: Arc<FakeProvider>) -> axum::Router {
    let state = AppState::with_provider(provider, 24, TruncationPolicy::capped(10, 5));
    plm_aspects::build_router(state)
}

/// Send a request, returning status and parsed JSON body
pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
