//! Error types for the recommendation service
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for recommendation operations
#[derive(Error, Debug)]
pub enum RecommendError {
    /// Client-facing validation error: query was empty after trimming
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// The catalog table and the vector index disagree about the corpus.
    /// This indicates the offline artifacts were built out of sync and
    /// cannot be recovered at request time.
    #[error(
        "Catalog and vector index are misaligned: {reason}\nSuggestion: Rebuild the vector index from the current catalog with `recsift build-index`"
    )]
    CorpusMisaligned { reason: String },

    /// Catalog file errors
    #[error(
        "Failed to load catalog from '{path}': {source}\nSuggestion: Check the file exists and has the expected columns"
    )]
    CatalogLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Vector artifact errors
    #[error("Vector index error: {0}")]
    Vector(#[from] crate::vector::VectorError),

    /// Embedding model errors
    #[error(
        "Embedding generation failed: {0}\nSuggestion: Verify the embedding model is properly initialized"
    )]
    Embedding(String),

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl RecommendError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "EMPTY_QUERY",
            Self::CorpusMisaligned { .. } => "CORPUS_MISALIGNED",
            Self::CatalogLoad { .. } => "CATALOG_LOAD_FAILED",
            Self::Vector(_) => "VECTOR_ERROR",
            Self::Embedding(_) => "EMBEDDING_FAILED",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Whether the error is the caller's fault (maps to HTTP 400)
    /// rather than a server-side failure (HTTP 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }
}

/// Result type alias for recommendation operations
pub type RecommendResult<T> = Result<T, RecommendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(RecommendError::EmptyQuery.status_code(), "EMPTY_QUERY");
        assert_eq!(
            RecommendError::CorpusMisaligned {
                reason: "catalog has 10 rows, index has 9".to_string()
            }
            .status_code(),
            "CORPUS_MISALIGNED"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(RecommendError::EmptyQuery.is_client_error());
        assert!(
            !RecommendError::CorpusMisaligned {
                reason: "x".to_string()
            }
            .is_client_error()
        );
    }
}
