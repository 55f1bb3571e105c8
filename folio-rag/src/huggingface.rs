//! Hugging Face Inference API embedding provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Default sentence-embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Dimensionality of [`DEFAULT_EMBEDDING_MODEL`] vectors.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

const HF_INFERENCE_BASE: &str = "https://router.huggingface.co/hf-inference/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── request types ──

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

// ── provider ──

/// Embeddings via the Hugging Face feature-extraction pipeline.
pub struct HfEmbeddingProvider {
    client: Client,
    token: String,
    model: String,
    dimensions: usize,
    base_url: String,
    timeout: Duration,
}

impl HfEmbeddingProvider {
    /// Create a provider using [`DEFAULT_EMBEDDING_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `token` is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_model(token, DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_DIMENSIONS)
    }

    /// Create a provider for a specific model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `token` is empty.
    pub fn with_model(
        token: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(RagError::ConfigError("HF token must not be empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            token,
            model: model.into(),
            dimensions,
            base_url: HF_INFERENCE_BASE.to_string(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Create a provider from the `HF_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("HF_TOKEN")
            .map_err(|_| RagError::ConfigError("HF_TOKEN not set".to_string()))?;
        Self::new(token)
    }

    /// Override the inference base URL (e.g. a dedicated endpoint).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout (default 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/pipeline/feature-extraction", self.base_url, self.model)
    }

    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = inputs.len(), model = %self.model, "requesting embeddings");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .json(&FeatureExtractionRequest {
                inputs,
                options: RequestOptions { wait_for_model: true },
            })
            .send()
            .await
            .map_err(|e| RagError::EmbeddingError {
                provider: "huggingface".to_string(),
                message: format!("request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "embedding request rejected");
            return Err(RagError::EmbeddingError {
                provider: "huggingface".to_string(),
                message: format!("status {status}: {body}"),
            });
        }

        let vectors: Vec<Vec<f32>> =
            response.json().await.map_err(|e| RagError::EmbeddingError {
                provider: "huggingface".to_string(),
                message: format!("invalid response body: {e}"),
            })?;

        if vectors.len() != inputs.len() {
            return Err(RagError::EmbeddingError {
                provider: "huggingface".to_string(),
                message: format!(
                    "expected {} vectors, got {}",
                    inputs.len(),
                    vectors.len()
                ),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimensions {
                return Err(RagError::EmbeddingError {
                    provider: "huggingface".to_string(),
                    message: format!(
                        "model {} returned {} dimensions, expected {}",
                        self.model,
                        vector.len(),
                        self.dimensions
                    ),
                });
            }
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HfEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| RagError::EmbeddingError {
            provider: "huggingface".to_string(),
            message: "empty response for single input".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.request(texts).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model_and_pipeline() {
        let provider = HfEmbeddingProvider::new("tok").unwrap();
        assert_eq!(
            provider.endpoint(),
            "https://router.huggingface.co/hf-inference/models/\
             sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction"
        );
    }

    #[test]
    fn base_url_override_is_used() {
        let provider = HfEmbeddingProvider::with_model("tok", "acme/embedder", 16)
            .unwrap()
            .with_base_url("http://localhost:8080/models");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/models/acme/embedder/pipeline/feature-extraction"
        );
        assert_eq!(provider.dimensions(), 16);
        assert_eq!(provider.model_id(), "acme/embedder");
    }

    #[test]
    fn empty_token_is_rejected_at_construction() {
        assert!(matches!(HfEmbeddingProvider::new(""), Err(RagError::ConfigError(_))));
    }

    #[tokio::test]
    async fn stalled_server_fails_within_the_request_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // hold accepted connections open without ever answering
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let provider = HfEmbeddingProvider::with_model("tok", "acme/embedder", 4)
            .unwrap()
            .with_base_url(format!("http://{addr}/models"))
            .with_timeout(Duration::from_millis(200));

        let result =
            tokio::time::timeout(Duration::from_secs(5), provider.embed("query")).await;
        let err = result.expect("request should be cut off by its own timeout").unwrap_err();
        assert!(matches!(err, RagError::EmbeddingError { .. }));
    }
}
