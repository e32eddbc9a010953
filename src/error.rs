//! Error types for ConsultDesk
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ConsultDesk operations
///
/// Covers configuration loading, the key-value storage backend, user input
/// validation, lookups of missing records, and webhook plumbing.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value storage errors (opening, reading or flushing the database)
    #[error("Storage error: {0}")]
    Storage(String),

    /// User-supplied input was rejected (reminder drafts, workflow forms, login)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A record addressed by id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Webhook client construction errors
    ///
    /// Delivery failures are never surfaced as errors; see
    /// [`crate::webhook::DispatchOutcome`].
    #[error("Webhook error: {0}")]
    Webhook(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for ConsultDesk operations
///
/// Uses `anyhow::Error` as the error type so call sites can attach context
/// while still raising typed [`DeskError`] values.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = DeskError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = DeskError::Storage("database locked".to_string());
        assert_eq!(error.to_string(), "Storage error: database locked");
    }

    #[test]
    fn test_validation_error_display() {
        let error = DeskError::Validation("title is required".to_string());
        assert_eq!(error.to_string(), "Validation error: title is required");
    }

    #[test]
    fn test_not_found_error_display() {
        let error = DeskError::NotFound("chat 01ABC".to_string());
        assert_eq!(error.to_string(), "Not found: chat 01ABC");
    }

    #[test]
    fn test_webhook_error_display() {
        let error = DeskError::Webhook("client build failed".to_string());
        assert_eq!(error.to_string(), "Webhook error: client build failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: DeskError = io_error.into();
        assert!(matches!(error, DeskError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: DeskError = json_error.into();
        assert!(matches!(error, DeskError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: DeskError = yaml_error.into();
        assert!(matches!(error, DeskError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DeskError>();
    }
}
