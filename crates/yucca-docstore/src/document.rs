//! Document and key models
//!
//! A document is a JSON object; field access uses dotted paths so
//! predicates can reach into nested payloads.

use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::error::DatastoreError;

/// A stored document. The root is always a JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    value: Value,
}

impl Document {
    /// Wrap a JSON value; non-object roots are rejected.
    pub fn new(value: Value) -> Result<Self, DatastoreError> {
        if value.is_object() {
            Ok(Self { value })
        } else {
            Err(DatastoreError::InvalidDocument(
                "document root must be a JSON object".to_string(),
            ))
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Resolve a dotted field path (`"config.limits.max"`).
    ///
    /// Returns `None` when any path segment is missing or a non-object
    /// value is traversed.
    pub fn field(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.value, |current, segment| current.get(segment))
    }
}

/// Identity of a document inside a collection.
///
/// Keys are opaque strings; producers must derive them deterministically
/// so they stay stable across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_requires_object_root() {
        assert!(Document::new(json!({"a": 1})).is_ok());
        assert!(Document::new(json!([1, 2])).is_err());
        assert!(Document::new(json!("scalar")).is_err());
        assert!(Document::new(Value::Null).is_err());
    }

    #[test]
    fn test_field_path_lookup() {
        let doc = Document::new(json!({
            "config": {"limits": {"max": 10}},
            "version": 3
        }))
        .unwrap();

        assert_eq!(doc.field("version"), Some(&json!(3)));
        assert_eq!(doc.field("config.limits.max"), Some(&json!(10)));
        assert_eq!(doc.field("config.limits.min"), None);
        assert_eq!(doc.field("config.limits.max.deeper"), None);
        assert_eq!(doc.field("missing"), None);
    }

    #[test]
    fn test_key_display_round_trip() {
        let key = Key::new("tenant:ns:resource:ctx");
        assert_eq!(key.to_string(), "tenant:ns:resource:ctx");
        assert_eq!(key.as_str(), "tenant:ns:resource:ctx");
    }
}
