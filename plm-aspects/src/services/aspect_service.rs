//! Schema access through the cache
//!
//! `get_schema(category_id)` returns the cached schema while it is within
//! the TTL and otherwise fetches, normalizes and stores a fresh one. The
//! cache always holds untruncated schemas; presentation caps are applied
//! by callers via [`CategoryAspectSchema::truncated`].

use std::sync::Arc;
use tracing::{debug, info};

use super::aspect_cache::{AspectCache, CacheLookup};
use super::aspect_normalizer::AspectNormalizer;
use super::taxonomy_client::TaxonomyProvider;
use crate::error::AspectError;
use crate::models::CategoryAspectSchema;

#[derive(Clone)]
pub struct AspectService {
    cache: Arc<AspectCache>,
    provider: Arc<dyn TaxonomyProvider>,
    normalizer: AspectNormalizer,
}

impl AspectService {
    pub fn new(cache: Arc<AspectCache>, provider: Arc<dyn TaxonomyProvider>) -> Self {
        Self {
            cache,
            provider,
            normalizer: AspectNormalizer::untruncated(),
        }
    }

    pub fn cache(&self) -> &Arc<AspectCache> {
        &self.cache
    }

    /// Schema for `category_id`
    ///
    /// `force_refresh` skips a fresh entry and overwrites it with a new
    /// fetch. A failed fetch leaves whatever entry existed untouched.
    pub async fn get_schema(
        &self,
        category_id: &str,
        force_refresh: bool,
    ) -> Result<Arc<CategoryAspectSchema>, AspectError> {
        if !force_refresh {
            match self.cache.lookup(category_id).await {
                CacheLookup::Fresh(schema) => {
                    debug!(category_id = %category_id, "Aspect cache hit");
                    return Ok(schema);
                }
                CacheLookup::Stale(schema) => {
                    debug!(
                        category_id = %category_id,
                        fetched_at = %schema.fetched_at,
                        "Aspect cache entry stale, refetching"
                    );
                }
                CacheLookup::Missing => {
                    debug!(category_id = %category_id, "Aspect cache miss");
                }
            }
        }

        let schema = self
            .normalizer
            .fetch_schema(self.provider.as_ref(), category_id)
            .await?;

        info!(
            category_id = %category_id,
            descriptors = schema.descriptors.len(),
            forced = force_refresh,
            "Cached fresh aspect schema"
        );

        Ok(self.cache.put(schema).await)
    }
}
