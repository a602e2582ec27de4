//! Error types for the lexgate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; none of them is fatal to a
//! request, because the assistant converts upstream failures into degraded
//! answers.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for lexgate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Retrieval errors ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the upstream model call.
///
/// `NotConfigured` is the "no credential" signal; every other variant is an
/// upstream failure that the assistant answers around.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether this error means "no credential" rather than an upstream fault.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, ProviderError::NotConfigured(_))
    }
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Failed to load document {path}: {reason}")]
    DocumentLoad { path: PathBuf, reason: String },

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn document_load_error_names_the_file() {
        let err = Error::Retrieval(RetrievalError::DocumentLoad {
            path: PathBuf::from("data/broken.txt"),
            reason: "invalid UTF-8".into(),
        });
        assert!(err.to_string().contains("broken.txt"));
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn not_configured_is_distinguished() {
        assert!(ProviderError::NotConfigured("no key".into()).is_not_configured());
        assert!(!ProviderError::Network("refused".into()).is_not_configured());
    }
}
