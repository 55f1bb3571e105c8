//! Pipeline ingestion and retrieval tests with a deterministic embedder.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use folio_rag::config::RagConfig;
use folio_rag::embedding::EmbeddingProvider;
use folio_rag::error::{RagError, Result};
use folio_rag::memory::MemoryStore;
use folio_rag::pipeline::RagPipeline;
use folio_rag::vectorstore::VectorStore;
use tempfile::TempDir;

const DIM: usize = 8;

/// Spread the text's bytes over a normalized vector. Identical texts map to
/// identical vectors, distinct texts to distinct ones in practice.
fn hash_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for (i, b) in text.bytes().enumerate() {
        v[i % DIM] += f32::from(b) * ((i / DIM + 1) as f32);
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[derive(Default)]
struct MockEmbedder {
    batches: AtomicUsize,
}

impl MockEmbedder {
    fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hash_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| hash_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn model_id(&self) -> &str {
        "mock-embedder"
    }
}

fn pipeline_over(
    store: Arc<MemoryStore>,
    embedder: Arc<MockEmbedder>,
    config: RagConfig,
) -> RagPipeline {
    RagPipeline::builder()
        .embedder(embedder)
        .store(store)
        .config(config)
        .build()
        .unwrap()
}

#[tokio::test]
async fn ingest_reports_counts_and_fills_store() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("about.txt"), "Folio answers questions about a portfolio.")
        .unwrap();
    fs::write(dir.path().join("projects.md"), "# Projects\n\nA parser written in Rust.")
        .unwrap();
    fs::write(dir.path().join("notes.txt"), "Notes on deployment and hosting.").unwrap();

    let store = Arc::new(MemoryStore::new());
    let pipeline =
        pipeline_over(store.clone(), Arc::new(MockEmbedder::default()), RagConfig::default());

    let report = pipeline.ingest_dir(dir.path()).await.unwrap();
    assert_eq!(report.files_matched, 3);
    assert_eq!(report.documents, 3);
    assert_eq!(report.chunks, 3);
    assert_eq!(report.unique_chunks, 3);
    assert!(report.failures.is_empty());
    assert_eq!(store.count().await.unwrap(), 3);
}

#[tokio::test]
async fn duplicate_content_is_stored_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "The same boilerplate paragraph.").unwrap();
    fs::write(dir.path().join("b.txt"), "The same boilerplate paragraph.").unwrap();

    let store = Arc::new(MemoryStore::new());
    let pipeline =
        pipeline_over(store.clone(), Arc::new(MockEmbedder::default()), RagConfig::default());

    let report = pipeline.ingest_dir(dir.path()).await.unwrap();
    assert_eq!(report.chunks, 2);
    assert_eq!(report.unique_chunks, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn retrieve_returns_the_matching_chunk_first() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha alpha alpha").unwrap();
    fs::write(dir.path().join("b.txt"), "bravo bravo").unwrap();
    fs::write(dir.path().join("c.txt"), "charlie").unwrap();

    let store = Arc::new(MemoryStore::new());
    let pipeline =
        pipeline_over(store.clone(), Arc::new(MockEmbedder::default()), RagConfig::default());
    pipeline.ingest_dir(dir.path()).await.unwrap();

    let results = pipeline.retrieve("bravo bravo").await.unwrap();
    assert!(results.len() <= 3);
    assert_eq!(results[0].text, "bravo bravo");
    assert!((results[0].score - 1.0).abs() < 1e-5);
    assert_eq!(results[0].metadata.source_path, "b.txt");
}

#[tokio::test]
async fn empty_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let pipeline =
        pipeline_over(store, Arc::new(MockEmbedder::default()), RagConfig::default());

    let err = pipeline.ingest_dir(dir.path()).await.unwrap_err();
    assert!(matches!(err, RagError::NoDocumentsFound { .. }));
}

#[test]
fn build_rejects_a_config_assembled_without_the_builder() {
    // all-pub fields let a config skip RagConfigBuilder validation
    let config = RagConfig { chunk_size: 10, chunk_overlap: 20, top_k: 3 };
    let result = RagPipeline::builder()
        .embedder(Arc::new(MockEmbedder::default()))
        .store(Arc::new(MemoryStore::new()))
        .config(config)
        .build();
    assert!(matches!(result, Err(RagError::ConfigError(_))));
}

#[tokio::test]
async fn embedding_runs_in_bounded_batches() {
    let dir = TempDir::new().unwrap();
    // 40 distinct ten-character lines; a 10-char window with no overlap cuts
    // one chunk per line
    let text: String = (0..40).map(|i| format!("w{i:03} x{i:03}\n")).collect();
    fs::write(dir.path().join("long.txt"), text).unwrap();

    let config =
        RagConfig::builder().chunk_size(10).chunk_overlap(0).top_k(3).build().unwrap();
    let store = Arc::new(MemoryStore::new());
    let embedder = Arc::new(MockEmbedder::default());
    let pipeline = pipeline_over(store.clone(), embedder.clone(), config);

    let report = pipeline.ingest_dir(dir.path()).await.unwrap();
    assert_eq!(report.unique_chunks, 40);
    assert_eq!(embedder.batches(), 2);
    assert_eq!(store.count().await.unwrap(), 40);
}
