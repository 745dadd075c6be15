//! Error types for the yucca configuration service
//!
//! Every public operation returns [`ConfigError`], which maps one-to-one
//! onto a transport status so the gRPC shell can surface failures without
//! inspecting message text.

/// Result alias used across the service crates.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Service-level error kinds.
///
/// `NotFound` is never produced by the store itself; it exists so callers
/// that map an empty read to an error share the same type.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ConfigError {
    /// Shorthand for an `InvalidArgument` with an owned message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ConfigError::InvalidArgument(message.into())
    }

    /// Shorthand for a `FailedPrecondition` with an owned message.
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        ConfigError::FailedPrecondition(message.into())
    }

    /// Shorthand for an `Internal` with an owned message.
    pub fn internal(message: impl Into<String>) -> Self {
        ConfigError::Internal(message.into())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Internal(value.to_string())
    }
}

impl From<ConfigError> for tonic::Status {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::InvalidArgument(message) => tonic::Status::invalid_argument(message),
            ConfigError::FailedPrecondition(message) => {
                tonic::Status::failed_precondition(message)
            }
            ConfigError::NotFound(message) => tonic::Status::not_found(message),
            ConfigError::Internal(message) => tonic::Status::internal(message),
            ConfigError::Unavailable(message) => tonic::Status::unavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidArgument("empty tenant id".to_string());
        assert_eq!(format!("{}", err), "invalid argument: empty tenant id");

        let err = ConfigError::FailedPrecondition("condition mismatch".to_string());
        assert_eq!(format!("{}", err), "failed precondition: condition mismatch");

        let err = ConfigError::Unavailable("datastore down".to_string());
        assert_eq!(format!("{}", err), "unavailable: datastore down");
    }

    #[test]
    fn test_status_mapping() {
        let status = tonic::Status::from(ConfigError::invalid_argument("bad"));
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status = tonic::Status::from(ConfigError::failed_precondition("no match"));
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status = tonic::Status::from(ConfigError::internal("boom"));
        assert_eq!(status.code(), tonic::Code::Internal);

        let status = tonic::Status::from(ConfigError::Unavailable("down".to_string()));
        assert_eq!(status.code(), tonic::Code::Unavailable);

        let status = tonic::Status::from(ConfigError::NotFound("missing".to_string()));
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[test]
    fn test_serde_error_becomes_internal() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ConfigError::from(parse_err);
        assert!(matches!(err, ConfigError::Internal(_)));
    }
}
