//! Embedding provider abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that turns text into dense vectors.
///
/// Implementations are expected to return vectors of a fixed dimensionality
/// ([`dimensions`](EmbeddingProvider::dimensions)) produced by a single model
/// ([`model_id`](EmbeddingProvider::model_id)); stores persist the model id so
/// an index built with one model is never queried with another.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, returning one vector per input in order.
    ///
    /// The default implementation embeds sequentially; providers with a
    /// batch endpoint should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier of the underlying embedding model.
    fn model_id(&self) -> &str;
}
