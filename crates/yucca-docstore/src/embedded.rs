//! Embedded in-process backend
//!
//! Keeps every collection in memory behind an async `RwLock`. Suitable
//! for standalone (single-node) deployments and deterministic tests;
//! network-backed drivers implement the same traits out of tree.
//!
//! Atomicity notes: `upsert` and `update` linearize on the collection
//! write lock, and `bulk_upsert` applies the whole batch under a single
//! guard, which makes it trivially all-or-nothing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use tokio::sync::RwLock;

use crate::document::{Document, Key};
use crate::error::DatastoreError;
use crate::filter::{Filter, compare_values};
use crate::query::{Query, SortOrder};
use crate::traits::{Collection, Datastore, DocumentCursor, UpdateResult};

/// In-memory datastore holding named collections.
#[derive(Default)]
pub struct EmbeddedDatastore {
    collections: RwLock<HashMap<String, Arc<EmbeddedCollection>>>,
}

impl EmbeddedDatastore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Datastore for EmbeddedDatastore {
    async fn collection(&self, name: &str) -> Arc<dyn Collection> {
        if let Some(collection) = self.collections.read().await.get(name) {
            return collection.clone();
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(EmbeddedCollection::default()))
            .clone()
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// One in-memory collection. BTreeMap keeps iteration deterministic.
#[derive(Default)]
pub struct EmbeddedCollection {
    documents: RwLock<BTreeMap<String, Document>>,
}

#[async_trait]
impl Collection for EmbeddedCollection {
    async fn upsert(&self, key: &Key, document: Document) -> Result<(), DatastoreError> {
        let mut documents = self.documents.write().await;
        documents.insert(key.as_str().to_string(), document);
        Ok(())
    }

    async fn update(
        &self,
        key: &Key,
        document: Document,
        condition: &Filter,
    ) -> Result<UpdateResult, DatastoreError> {
        let mut documents = self.documents.write().await;
        match documents.get(key.as_str()) {
            Some(existing) if condition.matches(existing) => {
                documents.insert(key.as_str().to_string(), document);
                Ok(UpdateResult { updated_count: 1 })
            }
            _ => Ok(UpdateResult::default()),
        }
    }

    async fn bulk_upsert(&self, batch: Vec<(Key, Document)>) -> Result<bool, DatastoreError> {
        let mut documents = self.documents.write().await;
        for (key, document) in batch {
            documents.insert(key.as_str().to_string(), document);
        }
        Ok(true)
    }

    async fn delete(&self, filter: &Filter) -> Result<u64, DatastoreError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|_, document| !filter.matches(document));
        Ok((before - documents.len()) as u64)
    }

    async fn query(&self, query: Query) -> Result<DocumentCursor, DatastoreError> {
        // Snapshot under the read guard, then evaluate outside of it so the
        // returned cursor owns plain data and releases nothing but memory.
        let mut results: Vec<Document> = {
            let documents = self.documents.read().await;
            documents
                .values()
                .filter(|document| {
                    query
                        .filter
                        .as_ref()
                        .is_none_or(|filter| filter.matches(document))
                })
                .cloned()
                .collect()
        };

        if !query.sorts.is_empty() {
            results.sort_by(|a, b| {
                for sort in &query.sorts {
                    let ordering = compare_documents(a, b, &sort.field);
                    let ordering = match sort.order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    };
                    if ordering != std::cmp::Ordering::Equal {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        if let Some(page) = query.pagination {
            results = results
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect();
        }

        tracing::trace!(matched = results.len(), "embedded query evaluated");
        Ok(Box::pin(stream::iter(results.into_iter().map(Ok))))
    }
}

/// Field comparison for sorting; missing fields sort before present ones,
/// incomparable pairs keep their relative order (the sort is stable).
fn compare_documents(a: &Document, b: &Document, field: &str) -> std::cmp::Ordering {
    match (a.field(field), b.field(field)) {
        (Some(lhs), Some(rhs)) => {
            compare_values(lhs, rhs).unwrap_or(std::cmp::Ordering::Equal)
        }
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}
