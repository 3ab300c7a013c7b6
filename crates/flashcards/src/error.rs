//! Error types for flashcards.
//!
//! This module defines all error types used throughout the flashcards crate,
//! from configuration problems through remote table failures to rows that do
//! not have the shape of a flashcard.

use thiserror::Error;

/// The main error type for flashcards operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// No table identifier was configured.
    #[error("Notion database id not defined (set NOTION_DATABASE_ID)")]
    MissingDatabaseId,

    /// No API token was configured.
    #[error("Notion token not defined (set NOTION_TOKEN)")]
    MissingToken,

    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Shape Errors ===
    /// A row came back without its property bag.
    #[error("properties not defined in page object response (page {page_id})")]
    MissingProperties {
        /// Identifier of the offending row.
        page_id: String,
    },

    /// A row is missing one of the expected properties.
    #[error("page {page_id} has no '{property}' property")]
    MissingProperty {
        /// Identifier of the offending row.
        page_id: String,
        /// Name of the missing property.
        property: &'static str,
    },

    /// A property exists but has the wrong kind.
    #[error("database type error: page {page_id} property '{property}' is not of type {expected}")]
    PropertyKind {
        /// Identifier of the offending row.
        page_id: String,
        /// Name of the property.
        property: &'static str,
        /// The kind that was expected.
        expected: &'static str,
    },

    /// The title property has no text runs.
    #[error("page {page_id} has an empty title")]
    EmptyTitle {
        /// Identifier of the offending row.
        page_id: String,
    },

    // === View Errors ===
    /// A toggle referenced a card that is not in the deck.
    #[error("no card with id {id}")]
    UnknownCard {
        /// The requested identifier.
        id: String,
    },

    /// A sequence contained the same identifier twice.
    #[error("duplicate card id {id}")]
    DuplicateCard {
        /// The repeated identifier.
        id: String,
    },

    // === Remote Errors ===
    /// The HTTP request itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("remote returned {status}: {message}")]
    RemoteStatus {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for flashcards operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a property kind mismatch error.
    #[must_use]
    pub fn property_kind(
        page_id: impl Into<String>,
        property: &'static str,
        expected: &'static str,
    ) -> Self {
        Self::PropertyKind {
            page_id: page_id.into(),
            property,
            expected,
        }
    }

    /// Create a remote status error.
    #[must_use]
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteStatus {
            status,
            message: message.into(),
        }
    }

    /// Check if this error comes from missing or invalid configuration.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDatabaseId
                | Self::MissingToken
                | Self::ConfigLoad(_)
                | Self::ConfigValidation { .. }
        )
    }

    /// Check if this error means a row did not look like a flashcard.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::MissingProperties { .. }
                | Self::MissingProperty { .. }
                | Self::PropertyKind { .. }
                | Self::EmptyTitle { .. }
        )
    }

    /// Check if this error was produced by the remote service or the transport.
    #[must_use]
    pub fn is_remote_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::RemoteStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_id_display() {
        let err = Error::MissingDatabaseId;
        assert!(err.to_string().contains("database id not defined"));
        assert!(err.is_config_error());
        assert!(!err.is_shape_error());
    }

    #[test]
    fn test_property_kind_display() {
        let err = Error::property_kind("abc", "Checkbox", "checkbox");
        let msg = err.to_string();
        assert!(msg.contains("database type error"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("Checkbox"));
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_shape_errors() {
        assert!(Error::MissingProperties {
            page_id: "p".to_string()
        }
        .is_shape_error());
        assert!(Error::MissingProperty {
            page_id: "p".to_string(),
            property: "Name"
        }
        .is_shape_error());
        assert!(Error::EmptyTitle {
            page_id: "p".to_string()
        }
        .is_shape_error());
        assert!(!Error::internal("x").is_shape_error());
    }

    #[test]
    fn test_remote_status_display() {
        let err = Error::remote_status(404, "Could not find database");
        assert_eq!(err.to_string(), "remote returned 404: Could not find database");
        assert!(err.is_remote_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_unknown_card_display() {
        let err = Error::UnknownCard {
            id: "zzz".to_string(),
        };
        assert_eq!(err.to_string(), "no card with id zzz");
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "timeout_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("timeout_secs"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("address in use"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }
}
