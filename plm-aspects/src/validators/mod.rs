//! Listing validation layer
//!
//! - **listing_scorer** - presence, vocabulary and completeness scoring of
//!   a listing against a category aspect schema

pub mod listing_scorer;

pub use listing_scorer::ListingScorer;
