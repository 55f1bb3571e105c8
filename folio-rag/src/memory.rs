//! In-memory vector store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{EmbeddingRecord, SearchResult};
use crate::error::Result;
use crate::vectorstore::{VectorStore, rank_records};

/// A vector store backed by a `Vec` behind an async `RwLock`.
///
/// Scans every record on search; fine for the corpus sizes a personal
/// portfolio produces. Ties in similarity keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<EmbeddingRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn add(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        let mut guard = self.records.write().await;
        debug!(added = records.len(), total = guard.len() + records.len(), "adding records");
        guard.extend(records);
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let guard = self.records.read().await;
        Ok(rank_records(&guard, query, top_k))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
