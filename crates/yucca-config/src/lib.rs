//! Yucca Config - the versioned configuration store core
//!
//! This crate provides:
//! - The persisted `ConfigDocument` model and its deterministic key
//! - The filter compiler (client predicate tree -> docstore predicate)
//! - The injected `Clock` capability
//! - `VersionedConfigStore`: read-latest, write-with-version-bump, bulk
//!   variants, conditional writes, delete, and latest-per-context listing

pub mod clock;
pub mod document;
pub mod filter;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use document::ConfigDocument;
pub use store::VersionedConfigStore;
