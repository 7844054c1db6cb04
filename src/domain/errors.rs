//! Domain error types
//!
//! This module defines the error hierarchy for LedgerBridge.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main LedgerBridge error type
///
/// This is the primary error type used throughout the application.
/// A record whose processing returns one of these is counted as failed;
/// records that are intentionally not submitted are reported through
/// [`crate::domain::RecordOutcome::Skipped`] instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Accounting API errors
    #[error("Books API error: {0}")]
    BooksApi(#[from] BooksApiError),

    /// The record could not be mapped into a valid payload
    #[error("Malformed record: {0}")]
    Mapping(String),

    /// A required cross-entity reference could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Accounting API errors
///
/// Errors that occur when talking to the accounts server or the Books API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum BooksApiError {
    /// Failed to reach the server
    #[error("Failed to connect to Books API: {0}")]
    ConnectionFailed(String),

    /// Token exchange was rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response body could not be understood
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Entity search returned a non-success status
    #[error("Search in '{collection}' failed: {status} - {body}")]
    SearchFailed {
        collection: String,
        status: u16,
        body: String,
    },

    /// Create call returned a non-success status
    #[error("Submission failed: {status} - {body}")]
    SubmissionFailed { status: u16, body: String },
}

impl LedgerError {
    /// Short machine-friendly label used in logs and run summaries
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Configuration(_) => "configuration",
            LedgerError::BooksApi(BooksApiError::AuthenticationFailed(_)) => "authentication",
            LedgerError::BooksApi(BooksApiError::SubmissionFailed { .. }) => "submission",
            LedgerError::BooksApi(_) => "api",
            LedgerError::Mapping(_) => "mapping",
            LedgerError::Resolution(_) => "resolution",
            LedgerError::Validation(_) => "validation",
            LedgerError::Serialization(_) => "serialization",
            LedgerError::Io(_) => "io",
            LedgerError::Other(_) => "other",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LedgerError {
    fn from(err: toml::de::Error) -> Self {
        LedgerError::Configuration(format!("TOML parse error: {err}"))
    }
}
