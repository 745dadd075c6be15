//! Document store traits
//!
//! Defines the persistence capability the config core consumes. Backends
//! must keep two guarantees the core leans on:
//!
//! - `bulk_upsert` is all-or-nothing and preserves the input order
//! - `query` results hold their backing resources (connection, cursor)
//!   only for the lifetime of the returned stream; dropping the stream
//!   releases them on every exit path

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::document::{Document, Key};
use crate::error::DatastoreError;
use crate::filter::Filter;
use crate::query::Query;

/// Lazy document sequence. Dropping the stream releases the cursor.
pub type DocumentCursor = BoxStream<'static, Result<Document, DatastoreError>>;

/// Outcome of a conditional update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub updated_count: u64,
}

/// A keyed document collection.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Replace the document at `key` unconditionally.
    async fn upsert(&self, key: &Key, document: Document) -> Result<(), DatastoreError>;

    /// Replace the document at `key` only if the stored document matches
    /// `condition`. A missing key or a non-matching document leaves the
    /// collection unchanged and reports zero updates.
    async fn update(
        &self,
        key: &Key,
        document: Document,
        condition: &Filter,
    ) -> Result<UpdateResult, DatastoreError>;

    /// Write every entry or none of them, preserving input order.
    /// Returns whether the batch was applied.
    async fn bulk_upsert(&self, documents: Vec<(Key, Document)>) -> Result<bool, DatastoreError>;

    /// Remove every document matching `filter`; returns the removed count.
    async fn delete(&self, filter: &Filter) -> Result<u64, DatastoreError>;

    /// Run a read specification and stream the matching documents.
    async fn query(&self, query: Query) -> Result<DocumentCursor, DatastoreError>;
}

/// A named set of collections plus a liveness probe.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn collection(&self, name: &str) -> Arc<dyn Collection>;

    async fn health_check(&self) -> bool;
}
