//! Versioned config store
//!
//! The heart of the service: orchestrates the document-store adapter and
//! the filter compiler to provide read-latest, write-with-version-bump,
//! bulk variants, conditional (compare-and-set) writes, delete, and
//! latest-per-context listing.
//!
//! The store holds no mutable state of its own; per-key version
//! monotonicity relies on the adapter's atomic keyed upsert, and callers
//! that need compare-and-set semantics must pass an upsert condition.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::TryStreamExt;
use serde_json::Value;

use yucca_api::{
    ConfigError, ConfigResource, ConfigResourceContext, ContextSpecificConfig, Result,
    UpsertConfigRequest, UpsertedConfig,
};
use yucca_docstore::{Collection, Datastore, DatastoreError, Filter, Query};

use crate::clock::Clock;
use crate::document::{
    CONFIGURATIONS_COLLECTION, CONTEXT_FIELD, ConfigDocument, RESOURCE_NAME_FIELD,
    RESOURCE_NAMESPACE_FIELD, TENANT_ID_FIELD, VERSION_FIELD, document_key, is_null_config,
};
use crate::filter;

/// Versioned, multi-tenant configuration store over an abstract document
/// store.
pub struct VersionedConfigStore {
    datastore: Arc<dyn Datastore>,
    collection: Arc<dyn Collection>,
    clock: Arc<dyn Clock>,
}

impl VersionedConfigStore {
    pub async fn new(datastore: Arc<dyn Datastore>, clock: Arc<dyn Clock>) -> Self {
        let collection = datastore.collection(CONFIGURATIONS_COLLECTION).await;
        Self {
            datastore,
            collection,
            clock,
        }
    }

    /// Write one config version for `context`.
    ///
    /// Bumps the version past the previous document (or starts at 1),
    /// preserves the creation timestamp across updates, and honors the
    /// optional upsert condition as a compare-and-set over the previously
    /// stored document.
    pub async fn write_config(
        &self,
        context: &ConfigResourceContext,
        user_id: &str,
        user_email: &str,
        request: UpsertConfigRequest,
    ) -> Result<UpsertedConfig> {
        context.resource.validate()?;

        let previous_doc = self.latest_version_doc(context).await?;
        let previous_config = previous_doc.as_ref().and_then(to_context_specific);

        // reject create config with condition
        if previous_config.is_none() && request.upsert_condition.is_some() {
            return Err(ConfigError::failed_precondition(
                "No upsert condition required for creating config",
            ));
        }

        let document = self.build_document(
            context,
            request.config,
            user_id,
            user_email,
            previous_doc.as_ref(),
        );
        let key = document_key(context);
        let encoded = document.encode()?;

        match &request.upsert_condition {
            Some(condition) => {
                let compiled = filter::compile(condition)?;
                let result = self
                    .collection
                    .update(&key, encoded, &compiled)
                    .await
                    .map_err(datastore_error)?;
                if result.updated_count == 0 {
                    return Err(ConfigError::failed_precondition(
                        "Update failed because upsert condition did not match given record",
                    ));
                }
            }
            None => self
                .collection
                .upsert(&key, encoded)
                .await
                .map_err(datastore_error)?,
        }

        tracing::debug!(
            tenant_id = %context.resource.tenant_id,
            resource = %context.resource.resource_name,
            context = %context.context,
            version = document.version,
            "config written"
        );
        Ok(upserted_config(document, previous_config))
    }

    /// Bulk variant of [`Self::write_config`], all-or-nothing.
    ///
    /// Results mirror the input order. If the adapter rejects the batch,
    /// nothing is persisted and the result is empty.
    pub async fn write_all_configs(
        &self,
        user_id: &str,
        user_email: &str,
        entries: Vec<(ConfigResourceContext, Value)>,
    ) -> Result<Vec<UpsertedConfig>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        for (context, _) in &entries {
            context.resource.validate()?;
        }

        let contexts: Vec<ConfigResourceContext> =
            entries.iter().map(|(context, _)| context.clone()).collect();
        let previous = self.latest_version_docs(&contexts).await?;

        let mut batch = Vec::with_capacity(entries.len());
        let mut documents = Vec::with_capacity(entries.len());
        for ((context, config), (_, previous_doc)) in entries.into_iter().zip(previous.iter()) {
            let document =
                self.build_document(&context, config, user_id, user_email, previous_doc.as_ref());
            batch.push((document_key(&context), document.encode()?));
            documents.push(document);
        }

        let applied = self
            .collection
            .bulk_upsert(batch)
            .await
            .map_err(datastore_error)?;
        if !applied {
            tracing::warn!(
                count = documents.len(),
                "bulk config write rejected by the adapter, nothing persisted"
            );
            return Ok(Vec::new());
        }

        Ok(documents
            .into_iter()
            .zip(previous)
            .map(|(document, (_, previous_doc))| {
                let previous_config = previous_doc.as_ref().and_then(to_context_specific);
                upserted_config(document, previous_config)
            })
            .collect())
    }

    /// Latest config for `context`; empty when absent or null.
    pub async fn get_config(
        &self,
        context: &ConfigResourceContext,
    ) -> Result<Option<ContextSpecificConfig>> {
        context.resource.validate()?;
        Ok(self
            .latest_version_doc(context)
            .await?
            .as_ref()
            .and_then(to_context_specific))
    }

    /// Batched [`Self::get_config`]; contexts without a non-null latest
    /// config are omitted from the result map.
    pub async fn get_context_configs(
        &self,
        contexts: &[ConfigResourceContext],
    ) -> Result<HashMap<ConfigResourceContext, ContextSpecificConfig>> {
        for context in contexts {
            context.resource.validate()?;
        }
        let latest = self.latest_version_docs(contexts).await?;
        Ok(latest
            .into_iter()
            .filter_map(|(context, document)| {
                let config = document.as_ref().and_then(to_context_specific)?;
                Some((context, config))
            })
            .collect())
    }

    /// Latest non-null config per context under `resource`, sorted by
    /// creation timestamp descending.
    pub async fn get_all_configs(
        &self,
        resource: &ConfigResource,
    ) -> Result<Vec<ContextSpecificConfig>> {
        resource.validate()?;
        let query = Query::new()
            .with_filter(resource_filter(resource))
            .sort_desc(VERSION_FIELD);

        let mut configs = Vec::new();
        let mut seen_contexts: HashSet<String> = HashSet::new();
        {
            let mut cursor = self.collection.query(query).await.map_err(datastore_error)?;
            while let Some(document) = cursor.try_next().await.map_err(datastore_error)? {
                let document = ConfigDocument::decode(document)?;
                if seen_contexts.insert(document.context.clone())
                    && let Some(config) = to_context_specific(&document)
                {
                    configs.push(config);
                }
            }
        }

        // stable sort: equal creation timestamps keep their first-appearance
        // order from the version-descending stream
        configs.sort_by(|a, b| b.creation_timestamp.cmp(&a.creation_timestamp));
        Ok(configs)
    }

    /// Delete every document (all versions) of the given contexts.
    /// Empty input is a no-op.
    pub async fn delete_configs(&self, contexts: &[ConfigResourceContext]) -> Result<()> {
        if contexts.is_empty() {
            return Ok(());
        }
        for context in contexts {
            context.resource.validate()?;
        }
        let filter = contexts_filter(contexts)?;
        let removed = self
            .collection
            .delete(&filter)
            .await
            .map_err(datastore_error)?;
        tracing::debug!(contexts = contexts.len(), removed, "config documents deleted");
        Ok(())
    }

    pub async fn health_check(&self) -> bool {
        self.datastore.health_check().await
    }

    fn build_document(
        &self,
        context: &ConfigResourceContext,
        config: Value,
        user_id: &str,
        user_email: &str,
        previous: Option<&ConfigDocument>,
    ) -> ConfigDocument {
        let update_timestamp = self.clock.now_millis();
        // creation survives updates only while a non-null config existed;
        // the version counter advances past any previous document
        let creation_timestamp = previous
            .filter(|document| !is_null_config(&document.config))
            .map(|document| document.creation_timestamp)
            .unwrap_or(update_timestamp);
        let version = previous.map(|document| document.version + 1).unwrap_or(1);

        ConfigDocument {
            resource_name: context.resource.resource_name.clone(),
            resource_namespace: context.resource.resource_namespace.clone(),
            tenant_id: context.resource.tenant_id.clone(),
            context: context.context.clone(),
            version,
            last_updated_user_id: user_id.to_string(),
            last_updated_user_email: user_email.to_string(),
            config,
            creation_timestamp,
            update_timestamp,
        }
    }

    async fn latest_version_doc(
        &self,
        context: &ConfigResourceContext,
    ) -> Result<Option<ConfigDocument>> {
        let query = Query::new()
            .with_filter(context_filter(context))
            .sort_desc(VERSION_FIELD)
            .paginate(0, 1);

        let mut cursor = self.collection.query(query).await.map_err(datastore_error)?;
        match cursor.try_next().await.map_err(datastore_error)? {
            Some(document) => Ok(Some(ConfigDocument::decode(document)?)),
            None => Ok(None),
        }
    }

    /// Latest documents for the given contexts, in input order; missing
    /// keys keep `None`.
    async fn latest_version_docs(
        &self,
        contexts: &[ConfigResourceContext],
    ) -> Result<Vec<(ConfigResourceContext, Option<ConfigDocument>)>> {
        if contexts.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new()
            .with_filter(contexts_filter(contexts)?)
            .paginate(0, contexts.len() as u64);

        let mut results: Vec<(ConfigResourceContext, Option<ConfigDocument>)> = contexts
            .iter()
            .cloned()
            .map(|context| (context, None))
            .collect();
        let slots: HashMap<ConfigResourceContext, usize> = contexts
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, context)| (context, index))
            .collect();

        let mut cursor = self.collection.query(query).await.map_err(datastore_error)?;
        while let Some(document) = cursor.try_next().await.map_err(datastore_error)? {
            let document = ConfigDocument::decode(document)?;
            if let Some(&slot) = slots.get(&document.resource_context()) {
                results[slot].1 = Some(document);
            }
        }
        Ok(results)
    }
}

/// Identity filter for a single context (all four identity fields).
fn context_filter(context: &ConfigResourceContext) -> Filter {
    Filter::and(vec![
        Filter::eq(RESOURCE_NAME_FIELD, context.resource.resource_name.clone()),
        Filter::eq(
            RESOURCE_NAMESPACE_FIELD,
            context.resource.resource_namespace.clone(),
        ),
        Filter::eq(TENANT_ID_FIELD, context.resource.tenant_id.clone()),
        Filter::eq(CONTEXT_FIELD, context.context.clone()),
    ])
}

/// Identity filter for a whole resource family.
fn resource_filter(resource: &ConfigResource) -> Filter {
    Filter::and(vec![
        Filter::eq(RESOURCE_NAME_FIELD, resource.resource_name.clone()),
        Filter::eq(RESOURCE_NAMESPACE_FIELD, resource.resource_namespace.clone()),
        Filter::eq(TENANT_ID_FIELD, resource.tenant_id.clone()),
    ])
}

/// Tenant-scoped filter selecting any of the given contexts.
///
/// All contexts must share one tenant; mixing tenants in a single batch is
/// a programming error. An empty list is likewise a programming error
/// (batch entry points no-op on empty input before reaching this).
fn contexts_filter(contexts: &[ConfigResourceContext]) -> Result<Filter> {
    let Some(first) = contexts.first() else {
        return Err(ConfigError::invalid_argument(
            "config resource contexts must not be empty",
        ));
    };
    let tenant_id = &first.resource.tenant_id;
    if contexts
        .iter()
        .any(|context| &context.resource.tenant_id != tenant_id)
    {
        return Err(ConfigError::internal(
            "config resource contexts span multiple tenants",
        ));
    }

    let mut children: Vec<Filter> = contexts
        .iter()
        .map(|context| {
            Filter::and(vec![
                Filter::eq(RESOURCE_NAME_FIELD, context.resource.resource_name.clone()),
                Filter::eq(
                    RESOURCE_NAMESPACE_FIELD,
                    context.resource.resource_namespace.clone(),
                ),
                Filter::eq(CONTEXT_FIELD, context.context.clone()),
            ])
        })
        .collect();
    let context_filter = if children.len() == 1 {
        children.remove(0)
    } else {
        Filter::or(children)
    };

    Ok(Filter::and(vec![
        Filter::eq(TENANT_ID_FIELD, tenant_id.clone()),
        context_filter,
    ]))
}

fn to_context_specific(document: &ConfigDocument) -> Option<ContextSpecificConfig> {
    if is_null_config(&document.config) {
        return None;
    }
    Some(ContextSpecificConfig {
        config: document.config.clone(),
        context: document.context.clone(),
        creation_timestamp: document.creation_timestamp,
        update_timestamp: document.update_timestamp,
    })
}

fn upserted_config(
    document: ConfigDocument,
    previous: Option<ContextSpecificConfig>,
) -> UpsertedConfig {
    UpsertedConfig {
        config: document.config,
        context: document.context,
        creation_timestamp: document.creation_timestamp,
        update_timestamp: document.update_timestamp,
        prev_config: previous.map(|config| config.config),
    }
}

fn datastore_error(error: DatastoreError) -> ConfigError {
    ConfigError::Internal(error.to_string())
}
