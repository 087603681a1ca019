//! Error type shared by every crate in the workspace

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The aggregation engine itself never produces errors; this type covers the
/// edges around it: decoding payloads, loading configuration, and persisting
/// console settings.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (file path, offending value, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    /// Create a storage corrupted error
    pub fn storage_corrupted(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageCorrupted, msg)
    }

    /// Create a system busy (I/O) error
    pub fn system_busy(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::SystemBusy, msg)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::system_busy(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::ConfigError);
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.message, "Configuration error");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::OrderPayloadInvalid, "expected array");
        assert_eq!(err.code, ErrorCode::OrderPayloadInvalid);
        assert_eq!(err.to_string(), "expected array");
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::storage_corrupted("settings file damaged")
            .with_detail("path", "/tmp/console-settings.json")
            .with_detail("line", 3);

        assert_eq!(err.code, ErrorCode::StorageCorrupted);
        let details = err.details.unwrap();
        assert_eq!(details.get("path").unwrap(), "/tmp/console-settings.json");
        assert_eq!(details.get("line").unwrap(), 3);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = io.into();
        assert_eq!(err.code, ErrorCode::SystemBusy);
        assert!(err.message.contains("read-only"));
    }
}
