//! Document ingestion, embedding, and retrieval for the Folio portfolio
//! assistant.
//!
//! The crate scans a directory for PDF, Markdown, and plain-text documents,
//! splits them into overlapping character windows, drops repeated content,
//! embeds the survivors through an [`EmbeddingProvider`], and persists the
//! vectors in a [`VectorStore`] for cosine-similarity retrieval.
//!
//! [`RagPipeline`] wires the stages together:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use folio_rag::{DiskStore, EmbeddingProvider, HfEmbeddingProvider, RagConfig, RagPipeline};
//!
//! # async fn run() -> folio_rag::Result<()> {
//! let embedder = Arc::new(HfEmbeddingProvider::from_env()?);
//! let store = Arc::new(
//!     DiskStore::open("index", embedder.model_id(), embedder.dimensions()).await?,
//! );
//! let pipeline = RagPipeline::builder()
//!     .embedder(embedder)
//!     .store(store)
//!     .config(RagConfig::default())
//!     .build()?;
//!
//! pipeline.ingest_dir("docs").await?;
//! let hits = pipeline.retrieve("which projects use Rust?").await?;
//! # Ok(())
//! # }
//! ```

pub mod chunking;
pub mod config;
pub mod disk;
pub mod document;
pub mod embedding;
pub mod error;
pub mod huggingface;
pub mod loader;
pub mod memory;
pub mod pipeline;
pub mod vectorstore;

pub use chunking::{SlidingWindowChunker, dedup_chunks};
pub use config::{RagConfig, RagConfigBuilder};
pub use disk::DiskStore;
pub use document::{Chunk, ChunkMetadata, Document, EmbeddingRecord, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use huggingface::{
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, HfEmbeddingProvider,
};
pub use loader::{LoadFailure, LoadOutcome, load_documents};
pub use memory::MemoryStore;
pub use pipeline::{IngestReport, RagPipeline, RagPipelineBuilder};
pub use vectorstore::{VectorStore, cosine_similarity};
