//! plm-aspects library interface
//!
//! Category-aspect requirement engine for the parts-listing manager:
//! fetches marketplace aspect schemas, caches them, maps display names to
//! inventory-platform field names, scores listings, and normalizes coil
//! voltages. Exposes `AppState` and `build_router` for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod validators;

pub use crate::error::{ApiError, ApiResult, AspectError};

use axum::Router;
use chrono::{DateTime, Utc};
use plm_common::config::TomlConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::TruncationPolicy;
use crate::services::{AspectCache, AspectService, StaticTokenProvider, TaxonomyClient, TaxonomyProvider};
use crate::validators::ListingScorer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Cached schema access
    pub aspects: AspectService,
    /// Allowed-value caps for UI-facing schema views
    pub truncation: TruncationPolicy,
    pub scorer: ListingScorer,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(aspects: AspectService, truncation: TruncationPolicy) -> Self {
        Self {
            aspects,
            truncation,
            scorer: ListingScorer::new(),
            startup_time: Utc::now(),
        }
    }

    /// State over an arbitrary provider, with a fresh process-wide cache
    pub fn with_provider(
        provider: Arc<dyn TaxonomyProvider>,
        ttl_hours: u32,
        truncation: TruncationPolicy,
    ) -> Self {
        let cache = Arc::new(AspectCache::with_ttl_hours(ttl_hours));
        Self::new(AspectService::new(cache, provider), truncation)
    }

    /// State wired to the HTTP taxonomy client described by `config`
    pub fn from_config(config: &TomlConfig, token: Option<String>) -> Result<Self, AspectError> {
        let tokens = Arc::new(StaticTokenProvider::new(token));
        let client = TaxonomyClient::new(&config.taxonomy, tokens)?;

        Ok(Self::with_provider(
            Arc::new(client),
            config.cache.ttl_hours,
            TruncationPolicy::from(&config.truncation),
        ))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::aspect_routes())
        .merge(api::field_routes())
        .merge(api::validate_routes())
        .merge(api::voltage_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
