//! Embedding generation via an OpenAI-compatible `/v1/embeddings` endpoint.
//!
//! Every chunk and every query goes through [`EmbeddingClient::embed`]. The
//! client retries transient failures (transport errors, 429/5xx) with a fixed
//! backoff schedule and validates that the returned vector matches
//! [`EMBEDDING_DIMENSION`], since a silent model change would corrupt the
//! pgvector column.

pub mod error;

use cardy_core::EMBEDDING_DIMENSION;
use serde::{Deserialize, Serialize};

pub use error::EmbeddingError;

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const MAX_RETRIES: usize = 3;
const RETRY_DELAYS_SECS: [u64; 4] = [0, 1, 2, 4];

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

/// Abstraction over embedding generation, so services can be exercised with
/// an in-memory fake in tests.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts; result order matches input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Client for an OpenAI-compatible embeddings API.
pub struct EmbeddingClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimension: usize,
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl EmbeddingClient {
    /// Creates a new embeddings client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, EmbeddingError> {
        let model = std::env::var("CARDY_EMBEDDING_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| EmbeddingError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model, dimension: EMBEDDING_DIMENSION })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_embeddings(
        &self,
        texts: &[&str],
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbeddingRequest { model: &self.model, input: texts };
        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS_SECS.get(attempt).copied().unwrap_or(4);
                tokio::time::sleep(std::time::Duration::from_secs(delay_secs)).await;
                tracing::warn!("embedding retry attempt {attempt}/{MAX_RETRIES}");
            }

            let response = match self
                .client
                .post(format!("{}/v1/embeddings", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(EmbeddingError::HttpRequest(e));
                        continue;
                    },
                };
                let parsed: EmbeddingResponse =
                    serde_json::from_str(&body).map_err(|e| EmbeddingError::JsonParse {
                        context: "embeddings response".to_owned(),
                        source: e,
                    })?;
                return self.collect_vectors(texts.len(), parsed);
            }

            let code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_owned());
            let err = EmbeddingError::HttpStatus { code, body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(EmbeddingError::RetriesExhausted(Box::new(
            last_error.unwrap_or(EmbeddingError::EmptyResponse),
        )))
    }

    /// Reorder by the API-reported index and check dimensionality.
    fn collect_vectors(
        &self,
        expected_count: usize,
        response: EmbeddingResponse,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if response.data.len() != expected_count {
            return Err(EmbeddingError::EmptyResponse);
        }
        let mut vectors: Vec<Vec<f32>> = vec![Vec::new(); expected_count];
        for row in response.data {
            if row.embedding.len() != self.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: row.embedding.len(),
                });
            }
            if row.index >= expected_count {
                return Err(EmbeddingError::EmptyResponse);
            }
            vectors[row.index] = row.embedding;
        }
        Ok(vectors)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request_embeddings(&[text]).await?;
        vectors.pop().ok_or(EmbeddingError::EmptyResponse)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts).await
    }
}
