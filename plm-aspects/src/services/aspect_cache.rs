//! Time-bounded in-process cache of category aspect schemas
//!
//! Constructed once per process and shared by reference (`Arc`). Entries are
//! keyed by category id and never removed: a stale entry is reported as a
//! miss on read and overwritten by the next `put`. Memory is bounded by the
//! number of distinct categories ever queried.
//!
//! The lock is held only for the map access itself, never across an
//! upstream fetch, so lookups for unrelated categories never wait on each
//! other. Concurrent misses for the same key may each fetch; the last `put`
//! wins.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::CategoryAspectSchema;

/// Default time-to-live for cached schemas
pub const DEFAULT_TTL_HOURS: u32 = 24;

/// Outcome of a cache read
#[derive(Debug, Clone)]
pub enum CacheLookup {
    Fresh(Arc<CategoryAspectSchema>),
    /// Present but older than the TTL
    Stale(Arc<CategoryAspectSchema>),
    Missing,
}

/// Counter snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub ttl_seconds: i64,
}

pub struct AspectCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Arc<CategoryAspectSchema>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
}

impl AspectCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale: AtomicU64::new(0),
        }
    }

    pub fn with_ttl_hours(hours: u32) -> Self {
        Self::new(Duration::hours(i64::from(hours)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True while `schema` is younger than the TTL at `now`
    pub fn is_fresh_at(&self, schema: &CategoryAspectSchema, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(schema.fetched_at) < self.ttl
    }

    /// Read `category_id`, classifying the entry against the TTL
    pub async fn lookup(&self, category_id: &str) -> CacheLookup {
        let entry = self.entries.read().await.get(category_id).cloned();

        match entry {
            Some(schema) if self.is_fresh_at(&schema, Utc::now()) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Fresh(schema)
            }
            Some(schema) => {
                self.stale.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Stale(schema)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                CacheLookup::Missing
            }
        }
    }

    /// Fresh schema for `category_id`, if any
    pub async fn get(&self, category_id: &str) -> Option<Arc<CategoryAspectSchema>> {
        match self.lookup(category_id).await {
            CacheLookup::Fresh(schema) => Some(schema),
            CacheLookup::Stale(_) | CacheLookup::Missing => None,
        }
    }

    /// Store `schema` under its category id, superseding any previous entry
    pub async fn put(&self, schema: CategoryAspectSchema) -> Arc<CategoryAspectSchema> {
        let schema = Arc::new(schema);
        self.entries
            .write()
            .await
            .insert(schema.category_id.clone(), Arc::clone(&schema));
        schema
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            ttl_seconds: self.ttl.num_seconds(),
        }
    }
}

impl Default for AspectCache {
    fn default() -> Self {
        Self::with_ttl_hours(DEFAULT_TTL_HOURS)
    }
}
