//! Error types for the trustscan analysis pipeline.
//!
//! The analyzers themselves never fail (every extraction step has a defined
//! default); these errors only surface at the edges: reading artifacts,
//! parsing report documents, loading configuration and calling the ML
//! collaborator.

use thiserror::Error;

/// Main error type for trustscan operations.
#[derive(Debug, Error)]
pub enum TrustScanError {
    /// Input is not in the expected binary format
    #[error("Invalid binary format: {0}")]
    InvalidFormat(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Collaborator call exceeded its deadline
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Resource limit exceeded
    #[error("Resource limit exceeded: {resource} ({used}/{limit})")]
    ResourceExhausted {
        resource: String,
        used: u64,
        limit: u64,
    },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// External collaborator (ML scorer, provider) failure
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for TrustScanError {
    fn from(err: serde_json::Error) -> Self {
        TrustScanError::Serialization(err.to_string())
    }
}

/// Result type alias for trustscan operations
pub type Result<T> = std::result::Result<T, TrustScanError>;
