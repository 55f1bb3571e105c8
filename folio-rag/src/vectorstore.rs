//! Vector store abstraction.

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::document::{EmbeddingRecord, SearchResult};
use crate::error::Result;

/// An append-only store of embedded chunks, searchable by cosine similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append records to the store.
    async fn add(&self, records: Vec<EmbeddingRecord>) -> Result<()>;

    /// Return up to `top_k` records most similar to `query`, ordered from
    /// most to least similar.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of records in the store.
    async fn count(&self) -> Result<usize>;
}

/// Rank records by cosine similarity to `query` and keep the best `top_k`.
///
/// The sort is stable, so records with equal scores keep insertion order.
pub(crate) fn rank_records(
    records: &[EmbeddingRecord],
    query: &[f32],
    top_k: usize,
) -> Vec<SearchResult> {
    let mut scored: Vec<(f32, &EmbeddingRecord)> = records
        .iter()
        .map(|record| (cosine_similarity(query, &record.vector), record))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(top_k)
        .map(|(score, record)| SearchResult {
            text: record.text.clone(),
            metadata: record.metadata.clone(),
            score,
        })
        .collect()
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let v = vec![0.6, 0.8, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_similarity_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_have_similarity_negative_one() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_yields_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
