//! # PLM Common Library
//!
//! Shared code for the parts-listing manager services:
//! - Error types
//! - TOML configuration model, loading and atomic write-back

pub mod config;
pub mod error;

pub use error::{Error, Result};
