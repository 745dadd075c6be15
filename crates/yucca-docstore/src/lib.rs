//! Yucca Docstore - abstract document persistence
//!
//! This crate provides:
//! - The `Datastore` / `Collection` traits consumed by the config core
//! - Document, key, predicate, and query models
//! - A lazy document cursor with release-on-drop semantics
//! - An embedded in-process backend for standalone deployments and tests
//!
//! Concrete network-backed drivers (Mongo and friends) implement the same
//! traits out of tree.

pub mod document;
pub mod embedded;
pub mod error;
pub mod filter;
pub mod query;
pub mod traits;

// Re-export commonly used types
pub use document::{Document, Key};
pub use embedded::EmbeddedDatastore;
pub use error::DatastoreError;
pub use filter::{Filter, RelationalOp};
pub use query::{Pagination, Query, Sort, SortOrder};
pub use traits::{Collection, Datastore, DocumentCursor, UpdateResult};
