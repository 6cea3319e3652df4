//! ProjectStore implementation for PgStorage.

use async_trait::async_trait;
use cardy_core::{Project, ProjectInput};
use uuid::Uuid;

use crate::error::StorageError;
use crate::traits::ProjectStore;

use super::{PROJECT_COLUMNS, PgStorage, row_to_project};

#[async_trait]
impl ProjectStore for PgStorage {
    async fn create_project(&self, input: &ProjectInput) -> Result<Project, StorageError> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            "INSERT INTO projects (id, name, project_type, details, source_url, drive_url, tracker_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PROJECT_COLUMNS}",
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.project_type.as_str())
        .bind(&input.details)
        .bind(&input.source_url)
        .bind(&input.drive_url)
        .bind(&input.tracker_url)
        .fetch_one(self.pool())
        .await?;
        row_to_project(&row)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(row_to_project).transpose()
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_project).collect()
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM projects WHERE id = $1").bind(id).execute(self.pool()).await?;
        Ok(result.rows_affected() > 0)
    }
}
