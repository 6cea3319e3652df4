//! SimilaritySearch implementation for PgStorage.
//!
//! Cosine similarity over pgvector (`1.0 - (embedding <=> query)`), filtered
//! to an optional project/document scope. The scan query backs the graceful
//! fallback when nothing clears the similarity threshold.

use async_trait::async_trait;
use cardy_core::{ContextScope, ScoredChunk};

use crate::error::StorageError;
use crate::traits::SimilaritySearch;

use super::{PgStorage, effective_limit, row_to_scored_chunk, scope_binds, vector_literal};

#[async_trait]
impl SimilaritySearch for PgStorage {
    async fn match_chunks(
        &self,
        query_vec: &[f32],
        threshold: f32,
        limit: usize,
        scope: &ContextScope,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        if query_vec.is_empty() {
            return Ok(Vec::new());
        }

        let vec_str = vector_literal(query_vec);
        let (project_filter, doc_filter) = scope_binds(scope);
        let rows = sqlx::query(
            "SELECT c.document_id, d.title AS document_name, c.chunk_index, c.chunk_text,
                    1.0 - (c.embedding <=> $1::vector) AS similarity
               FROM document_chunks c
               JOIN documents d ON d.id = c.document_id
              WHERE c.embedding IS NOT NULL
                AND ($2::uuid IS NULL OR c.project_id = $2)
                AND ($3::uuid[] IS NULL OR c.document_id = ANY($3))
                AND 1.0 - (c.embedding <=> $1::vector) >= $4
              ORDER BY c.embedding <=> $1::vector
              LIMIT $5",
        )
        .bind(&vec_str)
        .bind(project_filter)
        .bind(doc_filter)
        .bind(f64::from(threshold))
        .bind(effective_limit(limit))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_scored_chunk).collect()
    }

    async fn scan_chunks(
        &self,
        scope: &ContextScope,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        let (project_filter, doc_filter) = scope_binds(scope);
        let rows = sqlx::query(
            "SELECT c.document_id, d.title AS document_name, c.chunk_index, c.chunk_text,
                    0.0::float8 AS similarity
               FROM document_chunks c
               JOIN documents d ON d.id = c.document_id
              WHERE ($1::uuid IS NULL OR c.project_id = $1)
                AND ($2::uuid[] IS NULL OR c.document_id = ANY($2))
              ORDER BY c.document_id, c.chunk_index
              LIMIT $3",
        )
        .bind(project_filter)
        .bind(doc_filter)
        .bind(effective_limit(limit))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_scored_chunk).collect()
    }
}
