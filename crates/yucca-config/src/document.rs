//! Persisted config document model
//!
//! The serialized field names below are the storage contract; the tuple
//! `(tenantId, resourceNamespace, resourceName, context, version)` is
//! unique in the `configurations` collection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use yucca_api::{ConfigError, ConfigResource, ConfigResourceContext, Result};
use yucca_docstore::{Document, Key};

/// Collection holding all config documents.
pub const CONFIGURATIONS_COLLECTION: &str = "configurations";

// Storage field names (referenced by store-internal filters and sorts).
pub const RESOURCE_NAME_FIELD: &str = "resourceName";
pub const RESOURCE_NAMESPACE_FIELD: &str = "resourceNamespace";
pub const TENANT_ID_FIELD: &str = "tenantId";
pub const CONTEXT_FIELD: &str = "context";
pub const VERSION_FIELD: &str = "version";

/// One stored version of a configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    pub resource_name: String,
    pub resource_namespace: String,
    pub tenant_id: String,
    pub context: String,
    pub version: i64,
    pub last_updated_user_id: String,
    pub last_updated_user_email: String,
    pub config: Value,
    pub creation_timestamp: i64,
    pub update_timestamp: i64,
}

impl ConfigDocument {
    /// The context identity this document belongs to.
    pub fn resource_context(&self) -> ConfigResourceContext {
        ConfigResourceContext::new(
            ConfigResource {
                tenant_id: self.tenant_id.clone(),
                resource_namespace: self.resource_namespace.clone(),
                resource_name: self.resource_name.clone(),
            },
            self.context.clone(),
        )
    }

    /// Encode into the docstore representation. Failures are internal
    /// errors; the model always serializes to an object.
    pub fn encode(&self) -> Result<Document> {
        let value = serde_json::to_value(self)?;
        Document::new(value).map_err(|error| ConfigError::internal(error.to_string()))
    }

    /// Decode from the docstore representation.
    pub fn decode(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(document.into_value())?)
    }
}

/// Deterministic latest-slot key for a context: the identity fields joined
/// with `:`. Stable across restarts by construction.
pub fn document_key(context: &ConfigResourceContext) -> Key {
    Key::new(format!(
        "{}:{}:{}:{}",
        context.resource.tenant_id,
        context.resource.resource_namespace,
        context.resource.resource_name,
        context.context
    ))
}

/// A `null` config marks a logically absent configuration (I6); rows
/// carrying it are hidden from readers.
pub fn is_null_config(config: &Value) -> bool {
    config.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConfigDocument {
        ConfigDocument {
            resource_name: "rule-config".to_string(),
            resource_namespace: "labels".to_string(),
            tenant_id: "tenant-1".to_string(),
            context: "ctx-1".to_string(),
            version: 4,
            last_updated_user_id: "user-9".to_string(),
            last_updated_user_email: "user-9@example.com".to_string(),
            config: json!({"enabled": true, "limits": {"max": 10}}),
            creation_timestamp: 1_000,
            update_timestamp: 2_000,
        }
    }

    #[test]
    fn test_persisted_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        for field in [
            "resourceName",
            "resourceNamespace",
            "tenantId",
            "context",
            "version",
            "lastUpdatedUserId",
            "lastUpdatedUserEmail",
            "config",
            "creationTimestamp",
            "updateTimestamp",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
        assert_eq!(object.len(), 10);
    }

    #[test]
    fn test_encode_decode_round_trip_is_lossless() {
        let document = sample();
        let encoded = document.encode().unwrap();
        let decoded = ConfigDocument::decode(encoded).unwrap();
        assert_eq!(document, decoded);
    }

    #[test]
    fn test_document_key_is_deterministic() {
        let resource = ConfigResource::new("t1", "ns", "res").unwrap();
        let ctx = ConfigResourceContext::new(resource.clone(), "c9");
        assert_eq!(document_key(&ctx).to_string(), "t1:ns:res:c9");

        // singleton context keeps a stable (trailing-empty) key
        let singleton = ConfigResourceContext::singleton(resource);
        assert_eq!(document_key(&singleton).to_string(), "t1:ns:res:");
    }

    #[test]
    fn test_resource_context_round_trip() {
        let document = sample();
        let ctx = document.resource_context();
        assert_eq!(ctx.resource.tenant_id, "tenant-1");
        assert_eq!(ctx.context, "ctx-1");
        assert_eq!(document_key(&ctx).to_string(), "tenant-1:labels:rule-config:ctx-1");
    }

    #[test]
    fn test_null_config_detection() {
        assert!(is_null_config(&Value::Null));
        assert!(!is_null_config(&json!({})));
        assert!(!is_null_config(&json!(false)));
    }
}
