//! ChunkStore implementation for PgStorage.

use async_trait::async_trait;
use cardy_core::DocumentChunk;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::ChunkStore;

use super::{PgStorage, row_to_chunk, vector_literal};

#[async_trait]
impl ChunkStore for PgStorage {
    async fn insert_chunk(
        &self,
        chunk: &DocumentChunk,
        embedding: Option<&[f32]>,
    ) -> Result<(), StorageError> {
        let vec_str = embedding.map(vector_literal);
        sqlx::query(
            "INSERT INTO document_chunks
                 (id, document_id, project_id, chunk_index, chunk_text, metadata, embedding)
             VALUES ($1, $2, $3, $4, $5, $6, $7::vector)",
        )
        .bind(chunk.id)
        .bind(chunk.document_id)
        .bind(chunk.project_id)
        .bind(chunk.chunk_index)
        .bind(&chunk.text)
        .bind(&chunk.metadata)
        .bind(vec_str)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn chunks_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentChunk>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, document_id, project_id, chunk_index, chunk_text, metadata
               FROM document_chunks
              WHERE document_id = $1
              ORDER BY chunk_index",
        )
        .bind(document_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_chunk).collect()
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM document_chunks WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(self.pool())
                .await?;
        Ok(count)
    }

    async fn delete_chunks(&self, document_id: Uuid) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM document_chunks WHERE document_id = $1")
            .bind(document_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
