//! Change-event sink contract
//!
//! Events are emitted best-effort after successful persistence; a failing
//! sink never fails the user-visible operation. Within a single
//! `(tenant, id)` the overlay emits in call order; there is no cross-key
//! ordering guarantee.

use async_trait::async_trait;
use serde_json::Value;

/// What happened to a typed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One change notification for a typed object.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigChangeEvent {
    pub kind: ChangeKind,
    pub tenant_id: String,
    pub resource_name: String,
    pub id: String,
    pub prev: Option<Value>,
    pub curr: Option<Value>,
}

/// Fire-and-forget publication capability implemented by the deployment
/// (message bus, webhook, ...).
#[async_trait]
pub trait ConfigChangeEventSink: Send + Sync {
    async fn emit(&self, event: ConfigChangeEvent) -> anyhow::Result<()>;
}

/// Sink used when change-event publication is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventSink;

#[async_trait]
impl ConfigChangeEventSink for NoopEventSink {
    async fn emit(&self, _event: ConfigChangeEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_noop_sink_accepts_everything() {
        let sink = NoopEventSink;
        let event = ConfigChangeEvent {
            kind: ChangeKind::Created,
            tenant_id: "t1".to_string(),
            resource_name: "rule-config".to_string(),
            id: "x".to_string(),
            prev: None,
            curr: Some(json!({"id": "x"})),
        };
        assert!(sink.emit(event).await.is_ok());
    }
}
