//! End-to-end ingestion and retrieval pipeline.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::chunking::{SlidingWindowChunker, dedup_chunks};
use crate::config::RagConfig;
use crate::document::{EmbeddingRecord, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::{LoadFailure, load_documents};
use crate::vectorstore::VectorStore;

/// Number of chunks embedded per provider call.
const EMBED_BATCH_SIZE: usize = 32;

/// Counters from one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Files matched by the supported-type scan.
    pub files_matched: usize,
    /// Documents parsed; PDF pages count individually.
    pub documents: usize,
    /// Chunks produced by the sliding window.
    pub chunks: usize,
    /// Chunks left after deduplication; equals the records stored.
    pub unique_chunks: usize,
    /// Files that matched but could not be parsed.
    pub failures: Vec<LoadFailure>,
}

/// Ties together loading, chunking, embedding, and storage.
pub struct RagPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunker: SlidingWindowChunker,
    config: RagConfig,
}

impl RagPipeline {
    /// Create a new builder for constructing a [`RagPipeline`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Ingest every supported document under `root` into the store.
    pub async fn ingest_dir(&self, root: impl AsRef<Path>) -> Result<IngestReport> {
        let outcome = load_documents(root)?;
        info!(
            files = outcome.files_matched,
            documents = outcome.documents.len(),
            "loaded documents"
        );

        let chunks = self.chunker.chunk_all(&outcome.documents);
        let total_chunks = chunks.len();
        let unique = dedup_chunks(chunks);
        info!(chunks = total_chunks, unique = unique.len(), "chunked documents");

        let mut records = Vec::with_capacity(unique.len());
        for batch in unique.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(RagError::PipelineError(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            for (chunk, vector) in batch.iter().cloned().zip(vectors) {
                records.push(EmbeddingRecord::new(chunk, vector));
            }
        }

        let stored = records.len();
        self.store.add(records).await?;
        info!(stored, "stored embedded chunks");

        Ok(IngestReport {
            files_matched: outcome.files_matched,
            documents: outcome.documents.len(),
            chunks: total_chunks,
            unique_chunks: stored,
            failures: outcome.failures,
        })
    }

    /// Embed `query` and return the stored chunks most similar to it.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        debug!(top_k = self.config.top_k, "retrieving context");
        let vector = self.embedder.embed(query).await?;
        self.store.search(&vector, self.config.top_k).await
    }

    /// The configuration the pipeline was built with.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}

/// Builder for [`RagPipeline`].
#[derive(Default)]
pub struct RagPipelineBuilder {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn VectorStore>>,
    config: Option<RagConfig>,
}

impl RagPipelineBuilder {
    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector store.
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the pipeline configuration; defaults apply when omitted.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the [`RagPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] when the embedder or store is
    /// missing, or when the configuration fails [`RagConfig::validate`].
    pub fn build(self) -> Result<RagPipeline> {
        let embedder = self.embedder.ok_or_else(|| {
            RagError::ConfigError("pipeline requires an embedding provider".to_string())
        })?;
        let store = self
            .store
            .ok_or_else(|| RagError::ConfigError("pipeline requires a vector store".to_string()))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let chunker = SlidingWindowChunker::new(config.chunk_size, config.chunk_overlap);
        Ok(RagPipeline { embedder, store, chunker, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn build_without_embedder_fails() {
        let result = RagPipeline::builder().store(Arc::new(MemoryStore::new())).build();
        assert!(matches!(result, Err(RagError::ConfigError(_))));
    }
}
