//! Yucca API - transport-agnostic service model
//!
//! This crate provides:
//! - Resource identity types (tenant / namespace / resource / context)
//! - Request and response models for the versioned config store
//! - The structured predicate expression tree used by conditional upserts
//! - The service error type and its transport status mapping

pub mod error;
pub mod filter;
pub mod model;

// Re-export commonly used types
pub use error::{ConfigError, Result};
pub use filter::*;
pub use model::*;
