//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod artifacts;
mod chunks;
mod context;
mod documents;
mod projects;
mod search;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use cardy_core::{
    DEFAULT_QUERY_LIMIT, Document, DocumentChunk, DocumentStatus, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, Project, ProjectType, ScoredChunk,
    StoryArtifact,
};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Parse `DocumentStatus` from a PostgreSQL text column.
pub(crate) fn parse_pg_document_status(s: &str) -> DocumentStatus {
    s.parse().unwrap_or_else(|_| {
        tracing::warn!(invalid_status = %s, "corrupt document status in DB, defaulting to Failed");
        DocumentStatus::Failed
    })
}

/// Parse `ProjectType` from a PostgreSQL text column.
/// `FromStr` already maps unknown values to `General`.
pub(crate) fn parse_pg_project_type(s: &str) -> ProjectType {
    s.parse().unwrap_or(ProjectType::General)
}

/// Format an embedding as a pgvector literal for `$n::vector` binds.
pub(crate) fn vector_literal(embedding: &[f32]) -> String {
    format!("[{}]", embedding.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(","))
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn effective_limit(limit: usize) -> i64 {
    usize_to_i64(if limit == 0 { DEFAULT_QUERY_LIMIT } else { limit })
}

pub(crate) fn row_to_project(row: &sqlx::postgres::PgRow) -> Result<Project, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Project {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        project_type: parse_pg_project_type(&row.try_get::<String, _>("project_type")?),
        details: row.try_get("details")?,
        source_url: row.try_get("source_url")?,
        drive_url: row.try_get("drive_url")?,
        tracker_url: row.try_get("tracker_url")?,
        created_at,
    })
}

pub(crate) fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(Document {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        title: row.try_get("title")?,
        file_name: row.try_get("file_name")?,
        source_url: row.try_get("source_url")?,
        mime_type: row.try_get("mime_type")?,
        size_bytes: row.try_get("size_bytes")?,
        status: parse_pg_document_status(&row.try_get::<String, _>("status")?),
        created_at,
        updated_at,
    })
}

pub(crate) fn row_to_chunk(row: &sqlx::postgres::PgRow) -> Result<DocumentChunk, StorageError> {
    Ok(DocumentChunk {
        id: row.try_get("id")?,
        document_id: row.try_get("document_id")?,
        project_id: row.try_get("project_id")?,
        chunk_index: row.try_get("chunk_index")?,
        text: row.try_get("chunk_text")?,
        metadata: row.try_get("metadata")?,
    })
}

pub(crate) fn row_to_scored_chunk(
    row: &sqlx::postgres::PgRow,
) -> Result<ScoredChunk, StorageError> {
    let similarity: f64 = row.try_get("similarity").unwrap_or(0.0);
    Ok(ScoredChunk {
        document_id: row.try_get("document_id")?,
        document_name: row.try_get("document_name")?,
        chunk_index: row.try_get("chunk_index")?,
        text: row.try_get("chunk_text")?,
        similarity: similarity as f32,
    })
}

pub(crate) fn row_to_artifact(row: &sqlx::postgres::PgRow) -> Result<StoryArtifact, StorageError> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(StoryArtifact {
        ticket_key: row.try_get("ticket_key")?,
        design_content: row.try_get("design_content")?,
        code_content: row.try_get("code_content")?,
        tests_content: row.try_get("tests_content")?,
        test_cases_content: row.try_get("test_cases_content")?,
        created_at,
        updated_at,
    })
}

/// Scope filter binds shared by match and scan queries.
///
/// `document_ids` binds as NULL when empty so the SQL filter collapses to
/// a no-op instead of matching nothing.
pub(crate) fn scope_binds(
    scope: &cardy_core::ContextScope,
) -> (Option<Uuid>, Option<Vec<Uuid>>) {
    let doc_filter =
        if scope.document_ids.is_empty() { None } else { Some(scope.document_ids.clone()) };
    (scope.project_id, doc_filter)
}

pub(crate) const DOCUMENT_COLUMNS: &str =
    "id, project_id, title, file_name, source_url, mime_type, size_bytes, status,
     created_at, updated_at";

pub(crate) const PROJECT_COLUMNS: &str =
    "id, name, project_type, details, source_url, drive_url, tracker_url, created_at";

pub(crate) const ARTIFACT_COLUMNS: &str =
    "ticket_key, design_content, code_content, tests_content, test_cases_content,
     created_at, updated_at";
