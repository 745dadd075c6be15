//! Identified object store
//!
//! A typed view over the versioned config store for one resource family.
//! Identity comes from the object itself (`codec.id_of`), which becomes
//! the storage context; change events fire best-effort after successful
//! persistence.

use std::sync::Arc;

use yucca_api::{
    ConfigResource, ConfigResourceContext, ContextSpecificConfig, RequestContext, Result,
    UpsertConfigRequest, UpsertedConfig,
};
use yucca_config::VersionedConfigStore;

use crate::codec::ObjectCodec;
use crate::event::{ChangeKind, ConfigChangeEvent, ConfigChangeEventSink};

/// A typed object together with its storage timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredObject<T> {
    pub object: T,
    pub creation_timestamp: i64,
    pub update_timestamp: i64,
}

/// Typed, identity-keyed view over one `(namespace, resource)` family.
pub struct IdentifiedObjectStore<C: ObjectCodec> {
    store: Arc<VersionedConfigStore>,
    resource_namespace: String,
    resource_name: String,
    codec: C,
    event_sink: Arc<dyn ConfigChangeEventSink>,
}

impl<C: ObjectCodec> IdentifiedObjectStore<C> {
    pub fn new(
        store: Arc<VersionedConfigStore>,
        resource_namespace: impl Into<String>,
        resource_name: impl Into<String>,
        codec: C,
        event_sink: Arc<dyn ConfigChangeEventSink>,
    ) -> Self {
        Self {
            store,
            resource_namespace: resource_namespace.into(),
            resource_name: resource_name.into(),
            codec,
            event_sink,
        }
    }

    /// Write one object; emits `Created` or `Updated` after persistence.
    pub async fn upsert(
        &self,
        request: &RequestContext,
        object: C::Object,
    ) -> Result<StoredObject<C::Object>> {
        let value = self.codec.encode(&object)?;
        let id = self.codec.id_of(&object);
        let context = self.object_context(request, &id)?;

        let upserted = self
            .store
            .write_config(
                &context,
                &request.user_id,
                &request.user_email,
                UpsertConfigRequest::new(value),
            )
            .await?;

        self.emit(self.upsert_event(request, &id, &upserted)).await;

        Ok(StoredObject {
            object,
            creation_timestamp: upserted.creation_timestamp,
            update_timestamp: upserted.update_timestamp,
        })
    }

    /// Bulk [`Self::upsert`]. All-or-nothing; on a rejected batch nothing
    /// is persisted, no events fire, and the result is empty. Events for
    /// an applied batch fire per element in input order.
    pub async fn upsert_all(
        &self,
        request: &RequestContext,
        objects: Vec<C::Object>,
    ) -> Result<Vec<StoredObject<C::Object>>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::with_capacity(objects.len());
        for object in &objects {
            let value = self.codec.encode(object)?;
            let id = self.codec.id_of(object);
            entries.push((self.object_context(request, &id)?, value));
        }

        let results = self
            .store
            .write_all_configs(&request.user_id, &request.user_email, entries)
            .await?;
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let mut stored = Vec::with_capacity(objects.len());
        for (object, upserted) in objects.into_iter().zip(results) {
            let id = self.codec.id_of(&object);
            self.emit(self.upsert_event(request, &id, &upserted)).await;
            stored.push(StoredObject {
                object,
                creation_timestamp: upserted.creation_timestamp,
                update_timestamp: upserted.update_timestamp,
            });
        }
        Ok(stored)
    }

    /// Latest object stored under `id`; empty when absent or unreadable.
    pub async fn get(
        &self,
        request: &RequestContext,
        id: &str,
    ) -> Result<Option<StoredObject<C::Object>>> {
        let context = self.object_context(request, id)?;
        let Some(config) = self.store.get_config(&context).await? else {
            return Ok(None);
        };
        Ok(self.decode_stored(request, config))
    }

    /// All readable objects of this resource family, newest first.
    pub async fn get_all(&self, request: &RequestContext) -> Result<Vec<StoredObject<C::Object>>> {
        let resource = self.resource(request)?;
        let configs = self.store.get_all_configs(&resource).await?;
        Ok(configs
            .into_iter()
            .filter_map(|config| self.decode_stored(request, config))
            .collect())
    }

    /// [`Self::get_all`] narrowed by the caller-supplied filter.
    pub async fn get_all_filtered(
        &self,
        request: &RequestContext,
        filter: &C::Filter,
    ) -> Result<Vec<StoredObject<C::Object>>> {
        Ok(self
            .get_all(request)
            .await?
            .into_iter()
            .filter(|stored| self.codec.matches(&stored.object, filter))
            .collect())
    }

    /// Remove the object stored under `id`, emitting `Deleted` when it
    /// existed. Absent ids are a quiet no-op.
    pub async fn delete(&self, request: &RequestContext, id: &str) -> Result<Option<C::Object>> {
        let context = self.object_context(request, id)?;
        let Some(existing) = self.store.get_config(&context).await? else {
            return Ok(None);
        };

        self.store
            .delete_configs(std::slice::from_ref(&context))
            .await?;

        self.emit(ConfigChangeEvent {
            kind: ChangeKind::Deleted,
            tenant_id: request.tenant_id.clone(),
            resource_name: self.resource_name.clone(),
            id: id.to_string(),
            prev: Some(existing.config.clone()),
            curr: None,
        })
        .await;

        Ok(self.codec.decode(&existing.config))
    }

    /// Remove every object of this resource family, emitting `Deleted`
    /// per removed object.
    pub async fn delete_all(&self, request: &RequestContext) -> Result<Vec<C::Object>> {
        let resource = self.resource(request)?;
        let configs = self.store.get_all_configs(&resource).await?;
        if configs.is_empty() {
            return Ok(Vec::new());
        }

        let contexts: Vec<ConfigResourceContext> = configs
            .iter()
            .map(|config| ConfigResourceContext::new(resource.clone(), config.context.clone()))
            .collect();
        self.store.delete_configs(&contexts).await?;

        let mut deleted = Vec::with_capacity(configs.len());
        for config in configs {
            self.emit(ConfigChangeEvent {
                kind: ChangeKind::Deleted,
                tenant_id: request.tenant_id.clone(),
                resource_name: self.resource_name.clone(),
                id: config.context.clone(),
                prev: Some(config.config.clone()),
                curr: None,
            })
            .await;
            if let Some(object) = self.codec.decode(&config.config) {
                deleted.push(object);
            }
        }
        Ok(deleted)
    }

    fn resource(&self, request: &RequestContext) -> Result<ConfigResource> {
        ConfigResource::new(
            request.tenant_id.clone(),
            self.resource_namespace.clone(),
            self.resource_name.clone(),
        )
    }

    fn object_context(&self, request: &RequestContext, id: &str) -> Result<ConfigResourceContext> {
        Ok(ConfigResourceContext::new(self.resource(request)?, id))
    }

    fn upsert_event(
        &self,
        request: &RequestContext,
        id: &str,
        upserted: &UpsertedConfig,
    ) -> ConfigChangeEvent {
        let kind = if upserted.prev_config.is_some() {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        ConfigChangeEvent {
            kind,
            tenant_id: request.tenant_id.clone(),
            resource_name: self.resource_name.clone(),
            id: id.to_string(),
            prev: upserted.prev_config.clone(),
            curr: Some(upserted.config.clone()),
        }
    }

    fn decode_stored(
        &self,
        request: &RequestContext,
        config: ContextSpecificConfig,
    ) -> Option<StoredObject<C::Object>> {
        match self.codec.decode(&config.config) {
            Some(object) => Some(StoredObject {
                object,
                creation_timestamp: config.creation_timestamp,
                update_timestamp: config.update_timestamp,
            }),
            None => {
                tracing::warn!(
                    tenant_id = %request.tenant_id,
                    resource = %self.resource_name,
                    context = %config.context,
                    "skipping stored config that failed to decode"
                );
                None
            }
        }
    }

    /// Best-effort emission: sink failures are logged, never surfaced.
    async fn emit(&self, event: ConfigChangeEvent) {
        if let Err(error) = self.event_sink.emit(event).await {
            tracing::warn!(%error, "failed to publish config change event");
        }
    }
}
