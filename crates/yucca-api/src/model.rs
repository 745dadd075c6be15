//! Resource identities and request/response models
//!
//! A configuration is addressed by the tuple
//! `(tenantId, resourceNamespace, resourceName, context)`. The first three
//! form a [`ConfigResource`] (a logical configuration family); the
//! `context` distinguishes sibling configurations under the same resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::filter::FilterExpression;

/// The reserved context of singleton configurations.
pub const DEFAULT_CONTEXT: &str = "";

/// A logical configuration family owned by a single tenant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResource {
    pub tenant_id: String,
    pub resource_namespace: String,
    pub resource_name: String,
}

impl ConfigResource {
    /// Build a resource identity, rejecting empty components.
    pub fn new(
        tenant_id: impl Into<String>,
        resource_namespace: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Result<Self> {
        let resource = Self {
            tenant_id: tenant_id.into(),
            resource_namespace: resource_namespace.into(),
            resource_name: resource_name.into(),
        };
        resource.validate()?;
        Ok(resource)
    }

    /// Reject identities with empty tenant, namespace, or resource name.
    pub fn validate(&self) -> Result<()> {
        if self.tenant_id.is_empty() {
            return Err(ConfigError::invalid_argument("tenant id must not be empty"));
        }
        if self.resource_namespace.is_empty() {
            return Err(ConfigError::invalid_argument(
                "resource namespace must not be empty",
            ));
        }
        if self.resource_name.is_empty() {
            return Err(ConfigError::invalid_argument(
                "resource name must not be empty",
            ));
        }
        Ok(())
    }
}

/// A [`ConfigResource`] plus the context of one configuration instance.
///
/// The empty context is reserved for the singleton configuration of a
/// resource; any other value is a free-form sub-key (e.g. an entity id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResourceContext {
    pub resource: ConfigResource,
    pub context: String,
}

impl ConfigResourceContext {
    pub fn new(resource: ConfigResource, context: impl Into<String>) -> Self {
        Self {
            resource,
            context: context.into(),
        }
    }

    /// The singleton configuration of `resource`.
    pub fn singleton(resource: ConfigResource) -> Self {
        Self::new(resource, DEFAULT_CONTEXT)
    }
}

/// Caller identity extracted by the transport shell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub tenant_id: String,
    pub user_id: String,
    pub user_email: String,
}

impl RequestContext {
    pub fn new(
        tenant_id: impl Into<String>,
        user_id: impl Into<String>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            user_email: user_email.into(),
        }
    }
}

/// A single config write.
///
/// When `upsert_condition` is present the write only succeeds if the
/// predicate matches the previously stored document (compare-and-set).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertConfigRequest {
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert_condition: Option<FilterExpression>,
}

impl UpsertConfigRequest {
    pub fn new(config: Value) -> Self {
        Self {
            config,
            upsert_condition: None,
        }
    }

    pub fn with_condition(config: Value, condition: FilterExpression) -> Self {
        Self {
            config,
            upsert_condition: Some(condition),
        }
    }
}

/// The latest configuration stored under one context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSpecificConfig {
    pub config: Value,
    pub context: String,
    pub creation_timestamp: i64,
    pub update_timestamp: i64,
}

/// Result of a successful config write.
///
/// `prev_config` is present iff a previous non-null config existed for the
/// same context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertedConfig {
    pub config: Value,
    pub context: String,
    pub creation_timestamp: i64,
    pub update_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_config: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_resource_validation() {
        assert!(ConfigResource::new("tenant-1", "labels", "rule-config").is_ok());
        assert!(ConfigResource::new("", "labels", "rule-config").is_err());
        assert!(ConfigResource::new("tenant-1", "", "rule-config").is_err());
        assert!(ConfigResource::new("tenant-1", "labels", "").is_err());
    }

    #[test]
    fn test_config_resource_structural_equality() {
        let a = ConfigResource::new("t", "ns", "r").unwrap();
        let b = ConfigResource::new("t", "ns", "r").unwrap();
        assert_eq!(a, b);

        let c = ConfigResource::new("t", "ns", "other").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_singleton_context_is_empty() {
        let resource = ConfigResource::new("t", "ns", "r").unwrap();
        let ctx = ConfigResourceContext::singleton(resource);
        assert_eq!(ctx.context, DEFAULT_CONTEXT);
    }

    #[test]
    fn test_context_serde_round_trip() {
        let resource = ConfigResource::new("t", "ns", "r").unwrap();
        let ctx = ConfigResourceContext::new(resource, "entity-7");
        let json = serde_json::to_string(&ctx).unwrap();
        let back: ConfigResourceContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }
}
