//! Marketplace taxonomy API client
//!
//! Fetches the per-category aspect list:
//! `GET {base}/commerce/taxonomy/v1/category_tree/{tree}/get_item_aspects_for_category?category_id={id}`
//!
//! No retry and no client-side timeout: a single failure surfaces to the
//! caller as [`AspectError::SchemaFetch`], and request-level timeouts belong
//! to the HTTP layer in front of the service.

use async_trait::async_trait;
use plm_common::config::TaxonomyConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AspectError;

const USER_AGENT: &str = concat!("plm-aspects/", env!("CARGO_PKG_VERSION"));
const MARKETPLACE_HEADER: &str = "X-EBAY-C-MARKETPLACE-ID";

/// Raw aspect list for one category, as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAspectResponse {
    #[serde(default)]
    pub aspects: Vec<RawAspect>,
}

/// One raw aspect entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAspect {
    /// Localized display name
    #[serde(default)]
    pub localized_aspect_name: String,
    pub aspect_constraint: Option<RawAspectConstraint>,
    pub aspect_values: Option<Vec<RawAspectValue>>,
}

/// Constraint block of a raw aspect
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAspectConstraint {
    /// "REQUIRED" | "RECOMMENDED" | "OPTIONAL"
    pub aspect_usage: Option<String>,
    /// Provider marks mandatory aspects with this flag
    pub aspect_required: Option<bool>,
    /// "FREE_TEXT" | "SELECTION_ONLY"
    pub aspect_mode: Option<String>,
    pub aspect_data_type: Option<String>,
    /// "SINGLE" | "MULTI"
    pub item_to_aspect_cardinality: Option<String>,
    pub aspect_max_length: Option<u32>,
}

/// One allowed value
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAspectValue {
    #[serde(default)]
    pub localized_value: String,
}

/// Supplies the bearer token for taxonomy requests
///
/// Refreshing is the implementor's concern.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, AspectError>;
}

/// Fixed token from configuration
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AspectError> {
        self.token
            .clone()
            .ok_or_else(|| AspectError::fetch(None, "no bearer token configured"))
    }
}

/// Source of raw per-category aspect lists
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    async fn fetch_item_aspects(&self, category_id: &str) -> Result<RawAspectResponse, AspectError>;
}

/// HTTP taxonomy provider
pub struct TaxonomyClient {
    http_client: reqwest::Client,
    base_url: String,
    category_tree_id: String,
    marketplace_id: String,
    tokens: Arc<dyn TokenProvider>,
}

impl TaxonomyClient {
    pub fn new(config: &TaxonomyConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, AspectError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AspectError::fetch(None, e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            category_tree_id: config.category_tree_id.clone(),
            marketplace_id: config.marketplace_id.clone(),
            tokens,
        })
    }

    fn aspects_url(&self) -> String {
        format!(
            "{}/commerce/taxonomy/v1/category_tree/{}/get_item_aspects_for_category",
            self.base_url, self.category_tree_id
        )
    }
}

#[async_trait]
impl TaxonomyProvider for TaxonomyClient {
    async fn fetch_item_aspects(&self, category_id: &str) -> Result<RawAspectResponse, AspectError> {
        let token = self.tokens.bearer_token().await?;
        let url = self.aspects_url();

        tracing::debug!(category_id = %category_id, url = %url, "Querying taxonomy API");

        let response = self
            .http_client
            .get(&url)
            .query(&[("category_id", category_id)])
            .bearer_auth(token)
            .header(MARKETPLACE_HEADER, &self.marketplace_id)
            .send()
            .await
            .map_err(|e| AspectError::fetch(None, e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AspectError::fetch(Some(status.as_u16()), error_text));
        }

        let raw: RawAspectResponse = response
            .json()
            .await
            .map_err(|e| AspectError::fetch(Some(status.as_u16()), format!("malformed response: {}", e)))?;

        tracing::info!(
            category_id = %category_id,
            aspects = raw.aspects.len(),
            "Retrieved category aspects from taxonomy API"
        );

        Ok(raw)
    }
}
