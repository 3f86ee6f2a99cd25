use thiserror::Error;

use crate::engine::NormalizeError;
use crate::io::UpstreamError;
use crate::storage::StorageError;

/// Session-level failures: the connection is torn down and rebuilt
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Defects confined to a single payload
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unusable payload: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Policy for handling payload-level errors during a session
pub trait ErrorPolicy: Send + Sync {
    /// Return true to continue with the next payload, false to end the session
    fn handle_payload_error(&self, error: &PayloadError) -> bool;
}

/// Skip the defective payload and keep streaming
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_payload_error(&self, _error: &PayloadError) -> bool {
        true
    }
}

/// End the session on the first defective payload
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_payload_error(&self, _error: &PayloadError) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed() -> PayloadError {
        PayloadError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
    }

    #[test]
    fn skip_errors_continues() {
        assert!(SkipErrors.handle_payload_error(&malformed()));
        assert!(SkipErrors.handle_payload_error(&PayloadError::Normalize(
            NormalizeError::MissingField("id")
        )));
    }

    #[test]
    fn abort_on_error_stops() {
        assert!(!AbortOnError.handle_payload_error(&malformed()));
    }

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            PayloadError::Normalize(NormalizeError::MissingField("text")).to_string(),
            "Unusable payload: Missing required field: text"
        );
        assert_eq!(
            SessionError::Upstream(UpstreamError::Status { code: 401 }).to_string(),
            "Upstream error: server returned status code 401"
        );
    }

    #[test]
    fn storage_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match SessionError::from(StorageError::from(io_err)) {
            SessionError::Storage(StorageError::Io(_)) => {}
            _ => panic!("Expected Storage error variant"),
        }
    }
}
