//! ArtifactStore implementation for PgStorage.

use async_trait::async_trait;
use cardy_core::{ArtifactType, StoryArtifact};

use crate::error::StorageError;
use crate::traits::ArtifactStore;

use super::{ARTIFACT_COLUMNS, PgStorage, row_to_artifact};

#[async_trait]
impl ArtifactStore for PgStorage {
    async fn get_artifact(
        &self,
        ticket_key: &str,
    ) -> Result<Option<StoryArtifact>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {ARTIFACT_COLUMNS} FROM story_artifacts WHERE ticket_key = $1"
        ))
        .bind(ticket_key)
        .fetch_optional(self.pool())
        .await?;
        row.as_ref().map(row_to_artifact).transpose()
    }

    async fn upsert_artifact_content(
        &self,
        ticket_key: &str,
        artifact_type: ArtifactType,
        content: &str,
    ) -> Result<StoryArtifact, StorageError> {
        // Column name comes from the canonical table in core, never from input.
        let column = artifact_type.content_column();
        let row = sqlx::query(&format!(
            "INSERT INTO story_artifacts (ticket_key, {column})
             VALUES ($1, $2)
             ON CONFLICT (ticket_key)
             DO UPDATE SET {column} = EXCLUDED.{column}, updated_at = NOW()
             RETURNING {ARTIFACT_COLUMNS}",
        ))
        .bind(ticket_key)
        .bind(content)
        .fetch_one(self.pool())
        .await?;
        row_to_artifact(&row)
    }
}
