//! Error types for the `folio-chat` crate.

use thiserror::Error;

/// Errors that can occur while driving a conversation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// `resolve` was called with no question in flight.
    #[error("No question is pending; submit one first.")]
    NothingPending,

    /// An error occurred during text generation.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A retrieval failure bubbled up from the RAG layer.
    #[error(transparent)]
    Rag(#[from] folio_rag::RagError),
}

/// A convenience result type for conversation operations.
pub type Result<T> = std::result::Result<T, ChatError>;
