//! Scoped similarity search over stored chunks.

use std::sync::Arc;

use cardy_core::{ContextScope, ScoredChunk};
use cardy_embeddings::EmbeddingProvider;
use cardy_storage::traits::Storage;

use crate::ServiceError;

pub struct RetrievalService {
    storage: Arc<dyn Storage>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl RetrievalService {
    pub fn new(storage: Arc<dyn Storage>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { storage, embeddings }
    }

    /// Embed the query and return the best-matching chunks within `scope`.
    ///
    /// When nothing clears `threshold`, falls back to an unranked scan of the
    /// same scope so a sparse corpus still yields context. Zero matches is
    /// never an error; an empty result means the scope holds no chunks.
    pub async fn search(
        &self,
        query: &str,
        scope: &ContextScope,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, ServiceError> {
        if query.trim().is_empty() {
            return Err(ServiceError::InvalidInput("query must not be empty".into()));
        }

        let query_vec = self.embeddings.embed(query).await?;
        let matches = self.storage.match_chunks(&query_vec, threshold, limit, scope).await?;
        if !matches.is_empty() {
            return Ok(matches);
        }

        tracing::debug!(%threshold, "no chunks above threshold, falling back to scan");
        Ok(self.storage.scan_chunks(scope, limit).await?)
    }
}
