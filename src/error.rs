//! Error types for gplay-scraper
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::types::EntityKind;
use thiserror::Error;

/// The main error type for gplay-scraper
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Input Errors
    // ============================================================================
    #[error("Invalid {kind} input: {message}")]
    InvalidIdentifier { kind: EntityKind, message: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("{kind} not found: {identifier}")]
    NotFound {
        kind: EntityKind,
        identifier: String,
    },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(kind: EntityKind, message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: EntityKind, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            identifier: identifier.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The source confirmed the entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The caller supplied unusable input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidIdentifier { .. })
    }

    /// Check if this error came from the transport layer
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Network { .. } | Error::Http(_) | Error::HttpStatus { .. }
        )
    }
}

/// Result type alias for gplay-scraper
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_identifier(EntityKind::App, "app id must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid app input: app id must not be empty"
        );

        let err = Error::not_found(EntityKind::Review, "com.example.app");
        assert_eq!(err.to_string(), "review not found: com.example.app");

        let err = Error::http_status(503, "Service Unavailable");
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::not_found(EntityKind::App, "x").is_not_found());
        assert!(!Error::network("reset").is_not_found());

        assert!(Error::invalid_identifier(EntityKind::SearchResult, "empty").is_invalid_input());
        assert!(!Error::decode("no payload").is_invalid_input());

        assert!(Error::network("timeout").is_network());
        assert!(Error::http_status(500, "").is_network());
        assert!(!Error::config("bad").is_network());
    }
}
