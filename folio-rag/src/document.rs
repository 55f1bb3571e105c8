//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A source document produced by the loader.
///
/// One per source file, or one per page for paginated formats. Documents are
/// transient: only the chunks derived from them are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The text content of the document.
    pub text: String,
    /// Path of the source file, relative to the scan root.
    pub source_path: String,
    /// Lower-cased file extension without the leading dot (`pdf`, `md`, `txt`).
    pub file_type: String,
}

/// A bounded window of text cut from a [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Character offset of the window start within the source document.
    pub start_offset: usize,
    /// Path of the source file, inherited from the parent document.
    pub source_path: String,
    /// File type, inherited from the parent document.
    pub file_type: String,
}

/// Provenance carried alongside each persisted embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Path of the source file, relative to the scan root.
    pub source_path: String,
    /// Lower-cased file extension without the leading dot.
    pub file_type: String,
    /// Character offset of the chunk within its source document.
    pub start_offset: usize,
}

/// A persisted `(text, vector, metadata)` triple owned by the vector store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingRecord {
    /// The chunk text the vector was computed from.
    pub text: String,
    /// The embedding vector.
    pub vector: Vec<f32>,
    /// Provenance of the chunk.
    pub metadata: ChunkMetadata,
}

impl EmbeddingRecord {
    /// Pair a chunk with its embedding vector.
    pub fn new(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self {
            text: chunk.text,
            vector,
            metadata: ChunkMetadata {
                source_path: chunk.source_path,
                file_type: chunk.file_type,
                start_offset: chunk.start_offset,
            },
        }
    }
}

/// A retrieved chunk paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk text.
    pub text: String,
    /// Provenance of the chunk.
    pub metadata: ChunkMetadata,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
