//! ContextStore implementation for PgStorage.
//!
//! One row, replaced wholesale on every save; there is no per-user state.

use async_trait::async_trait;
use cardy_core::ContextScope;
use sqlx::Row;
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::ContextStore;

use super::PgStorage;

#[async_trait]
impl ContextStore for PgStorage {
    async fn save_context_selection(&self, scope: &ContextScope) -> Result<(), StorageError> {
        let document_ids = serde_json::to_value(&scope.document_ids)?;
        sqlx::query(
            "INSERT INTO context_selection (id, project_id, document_ids, updated_at)
             VALUES (1, $1, $2, NOW())
             ON CONFLICT (id)
             DO UPDATE SET project_id = EXCLUDED.project_id,
                           document_ids = EXCLUDED.document_ids,
                           updated_at = NOW()",
        )
        .bind(scope.project_id)
        .bind(document_ids)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn load_context_selection(&self) -> Result<Option<ContextScope>, StorageError> {
        let row = sqlx::query("SELECT project_id, document_ids FROM context_selection WHERE id = 1")
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(r) => {
                let project_id: Option<Uuid> = r.try_get("project_id")?;
                let ids_value: serde_json::Value = r.try_get("document_ids")?;
                let document_ids: Vec<Uuid> = serde_json::from_value(ids_value)?;
                Ok(Some(ContextScope { project_id, document_ids }))
            },
            None => Ok(None),
        }
    }
}
