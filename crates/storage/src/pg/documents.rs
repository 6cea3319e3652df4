//! DocumentStore implementation for PgStorage.

use async_trait::async_trait;
use cardy_core::{Document, DocumentContent, DocumentStatus};
use sqlx::Row;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::DocumentStore;

use super::{DOCUMENT_COLUMNS, PgStorage, row_to_document};

#[async_trait]
impl DocumentStore for PgStorage {
    async fn create_document(
        &self,
        project_id: Uuid,
        title: &str,
        file_name: &str,
        source_url: Option<&str>,
        mime_type: Option<&str>,
        size_bytes: i64,
        content: &DocumentContent,
    ) -> Result<Document, StorageError> {
        let id = Uuid::new_v4();
        let content_json = serde_json::to_value(content)?;
        let row = sqlx::query(&format!(
            "INSERT INTO documents
                 (id, project_id, title, file_name, source_url, mime_type, size_bytes, status, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {DOCUMENT_COLUMNS}",
        ))
        .bind(id)
        .bind(project_id)
        .bind(title)
        .bind(file_name)
        .bind(source_url)
        .bind(mime_type)
        .bind(size_bytes)
        .bind(DocumentStatus::Pending.as_str())
        .bind(content_json)
        .fetch_one(self.pool())
        .await?;
        row_to_document(&row)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, StorageError> {
        let row = sqlx::query(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn get_document_content(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentContent>, StorageError> {
        let row = sqlx::query("SELECT content FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(r) => {
                let value: serde_json::Value = r.try_get("content")?;
                Ok(Some(serde_json::from_value(value)?))
            },
            None => Ok(None),
        }
    }

    async fn list_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
              WHERE project_id = $1
              ORDER BY created_at DESC",
        ))
        .bind(project_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<(), StorageError> {
        let result =
            sqlx::query("UPDATE documents SET status = $1, updated_at = NOW() WHERE id = $2")
                .bind(status.as_str())
                .bind(id)
                .execute(self.pool())
                .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "document", id: id.to_string() });
        }
        Ok(())
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM documents WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }
}
