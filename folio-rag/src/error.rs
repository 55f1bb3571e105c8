//! Error types for the `folio-rag` crate.

use thiserror::Error;

/// Errors that can occur during ingestion and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// No supported documents were found under the scan root.
    #[error("No documents found in '{root}'. Place your files there.")]
    NoDocumentsFound {
        /// The directory that was scanned.
        root: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The persisted index was built with a different embedding model.
    #[error(
        "Index at '{path}' was built with embedding model '{found}' but '{expected}' is configured. \
         Re-run ingestion or switch back to the original model."
    )]
    ModelMismatch {
        /// The index directory carrying the manifest.
        path: String,
        /// The model recorded in the manifest.
        found: String,
        /// The model the caller configured.
        expected: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
