//! Datastore error type

/// Errors surfaced by document-store backends.
#[derive(thiserror::Error, Debug)]
pub enum DatastoreError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DatastoreError::InvalidDocument("root must be an object".to_string());
        assert_eq!(format!("{}", err), "invalid document: root must be an object");

        let err = DatastoreError::Backend("connection reset".to_string());
        assert_eq!(format!("{}", err), "backend error: connection reset");
    }
}
