//! Service modules for the aspect requirement engine
//!
//! - Taxonomy provider client (external collaborator boundary)
//! - Schema normalizer, TTL cache and the cached schema service
//! - Field-name mapper
//! - Coil voltage normalizer

pub mod aspect_cache;
pub mod aspect_normalizer;
pub mod aspect_service;
pub mod field_name_mapper;
pub mod taxonomy_client;
pub mod voltage_normalizer;

pub use aspect_cache::{AspectCache, CacheLookup, CacheStats};
pub use aspect_normalizer::AspectNormalizer;
pub use aspect_service::AspectService;
pub use field_name_mapper::{build_lookup, form_fields, map_name, FieldLookup};
pub use taxonomy_client::{
    RawAspect, RawAspectConstraint, RawAspectResponse, RawAspectValue, StaticTokenProvider,
    TaxonomyClient, TaxonomyProvider, TokenProvider,
};
