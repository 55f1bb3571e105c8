//! Append-only disk-backed vector store.
//!
//! An index is a directory holding `manifest.json` (format version, embedding
//! model id, dimensionality) and `records.jsonl` (one serialized record per
//! line). Records are loaded into memory on open; `add` appends to the
//! journal before extending the in-memory copy.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{EmbeddingRecord, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank_records};

const MANIFEST_FILE: &str = "manifest.json";
const RECORDS_FILE: &str = "records.jsonl";
const MANIFEST_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Manifest {
    version: u32,
    embedding_model: String,
    dimensions: usize,
}

/// A vector store persisted as a manifest plus a JSONL record journal.
#[derive(Debug)]
pub struct DiskStore {
    records_path: PathBuf,
    records: RwLock<Vec<EmbeddingRecord>>,
}

impl DiskStore {
    /// Open an index directory, creating it if absent.
    ///
    /// An existing index must have been built with the same embedding model;
    /// otherwise [`RagError::ModelMismatch`] is returned and the index is
    /// left untouched.
    pub async fn open(
        dir: impl AsRef<Path>,
        embedding_model: &str,
        dimensions: usize,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .await
            .map_err(|e| store_err(format!("creating {}: {e}", dir.display())))?;

        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            let raw = fs::read_to_string(&manifest_path)
                .await
                .map_err(|e| store_err(format!("reading manifest: {e}")))?;
            let manifest: Manifest = serde_json::from_str(&raw)
                .map_err(|e| store_err(format!("invalid manifest: {e}")))?;
            if manifest.version != MANIFEST_VERSION {
                return Err(store_err(format!(
                    "unsupported index version {} (supported: {MANIFEST_VERSION})",
                    manifest.version
                )));
            }
            if manifest.embedding_model != embedding_model {
                return Err(RagError::ModelMismatch {
                    path: dir.display().to_string(),
                    found: manifest.embedding_model,
                    expected: embedding_model.to_string(),
                });
            }
            if manifest.dimensions != dimensions {
                return Err(store_err(format!(
                    "index has {} dimensions, provider produces {dimensions}",
                    manifest.dimensions
                )));
            }
        } else {
            let manifest = Manifest {
                version: MANIFEST_VERSION,
                embedding_model: embedding_model.to_string(),
                dimensions,
            };
            let raw = serde_json::to_string_pretty(&manifest)
                .map_err(|e| store_err(format!("serializing manifest: {e}")))?;
            fs::write(&manifest_path, raw)
                .await
                .map_err(|e| store_err(format!("writing manifest: {e}")))?;
        }

        let records_path = dir.join(RECORDS_FILE);
        let records = if records_path.is_file() {
            load_records(&records_path).await?
        } else {
            Vec::new()
        };

        info!(path = %dir.display(), records = records.len(), "opened disk index");
        Ok(Self { records_path, records: RwLock::new(records) })
    }

    /// Whether `dir` holds an index manifest.
    pub fn exists(dir: impl AsRef<Path>) -> bool {
        dir.as_ref().join(MANIFEST_FILE).is_file()
    }
}

async fn load_records(path: &Path) -> Result<Vec<EmbeddingRecord>> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| store_err(format!("reading {}: {e}", path.display())))?;
    let mut records = Vec::new();
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: EmbeddingRecord = serde_json::from_str(line).map_err(|e| {
            store_err(format!("corrupt record at {}:{}: {e}", path.display(), number + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn store_err(message: String) -> RagError {
    RagError::VectorStoreError { backend: "disk".to_string(), message }
}

#[async_trait]
impl VectorStore for DiskStore {
    async fn add(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        // hold the write lock across the append so batches land whole
        let mut guard = self.records.write().await;
        let mut buffer = String::new();
        for record in &records {
            let line = serde_json::to_string(record)
                .map_err(|e| store_err(format!("serializing record: {e}")))?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.records_path)
            .await
            .map_err(|e| store_err(format!("opening {}: {e}", self.records_path.display())))?;
        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| store_err(format!("appending records: {e}")))?;
        file.flush()
            .await
            .map_err(|e| store_err(format!("flushing records: {e}")))?;

        debug!(added = records.len(), total = guard.len() + records.len(), "appended records");
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
