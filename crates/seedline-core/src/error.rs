//! Error types for the Seedline client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the backend uses to signal an invalid or missing session.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// A shared error type for the entire Seedline client.
///
/// Network-facing variants (`Transport`, `Http`, `MalformedResponse`) mirror the
/// three ways a call to the backend can fail. The remaining variants cover local
/// concerns such as storage and configuration.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum SeedlineError {
    /// The request never produced an HTTP response (DNS, connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http {
        status: u16,
        body: serde_json::Value,
    },

    /// The backend answered successfully but the body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built from the caller's input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Credential or config storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SeedlineError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an HTTP error from a status code and decoded body.
    pub fn http(status: u16, body: serde_json::Value) -> Self {
        Self::Http { status, body }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a MalformedResponse error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates an InvalidRequest error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Returns the HTTP status if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the backend rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(UNAUTHORIZED_STATUS)
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a malformed response error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SeedlineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SeedlineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SeedlineError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SeedlineError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// reqwest only reports errors that happen before a status line is read
/// (connect, timeout, body decode), so everything maps to `Transport`.
impl From<reqwest::Error> for SeedlineError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A type alias for `Result<T, SeedlineError>`.
pub type Result<T> = std::result::Result<T, SeedlineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unauthorized_detection() {
        let err = SeedlineError::http(401, json!({"message": "expired"}));
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));

        let err = SeedlineError::http(403, json!(null));
        assert!(!err.is_unauthorized());

        let err = SeedlineError::transport("connection refused");
        assert!(!err.is_unauthorized());
        assert!(err.status().is_none());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SeedlineError = io.into();
        assert!(err.to_string().contains("NotFound"));
    }
}
