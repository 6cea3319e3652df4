//! PostgreSQL schema migrations for cardy storage.

use anyhow::Result;
use sqlx::PgPool;

use cardy_core::EMBEDDING_DIMENSION;

/// Run all PostgreSQL migrations.
///
/// Every statement is idempotent; the function runs at startup on every boot.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            project_type TEXT NOT NULL DEFAULT 'general',
            details TEXT,
            source_url TEXT,
            drive_url TEXT,
            tracker_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id UUID PRIMARY KEY,
            project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            file_name TEXT NOT NULL,
            source_url TEXT,
            mime_type TEXT,
            size_bytes BIGINT NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'pending',
            content JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_docs_project ON documents (project_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_docs_status ON documents (status)")
        .execute(pool)
        .await?;

    // pgvector extension + chunk table
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector").execute(pool).await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS document_chunks (
            id UUID PRIMARY KEY,
            document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            project_id UUID NOT NULL,
            chunk_index INTEGER NOT NULL,
            chunk_text TEXT NOT NULL,
            metadata JSONB NOT NULL DEFAULT '{{}}',
            embedding vector({EMBEDDING_DIMENSION}),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (document_id, chunk_index)
        )
        "#,
    ))
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_project ON document_chunks (project_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_document ON document_chunks (document_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_chunks_embedding ON document_chunks \
         USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
    )
    .execute(pool)
    .await
    .ok(); // May fail if < 100 rows; that's fine

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS story_artifacts (
            ticket_key TEXT PRIMARY KEY,
            design_content TEXT,
            code_content TEXT,
            tests_content TEXT,
            test_cases_content TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Persisted context selection: a single row, replaced wholesale on save.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS context_selection (
            id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
            project_id UUID,
            document_ids JSONB NOT NULL DEFAULT '[]',
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations completed");
    Ok(())
}
