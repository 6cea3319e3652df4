//! Storage trait abstraction.
//!
//! Async domain traits split by concern, all returning [`StorageError`].
//! Services depend on these traits (usually through the [`Storage`]
//! supertrait) rather than on `PgStorage` directly, which keeps business
//! logic testable with in-memory fakes.

use async_trait::async_trait;
use cardy_core::{
    ArtifactType, ContextScope, Document, DocumentChunk, DocumentContent, DocumentStatus, Project,
    ProjectInput, ScoredChunk, StoryArtifact,
};
use uuid::Uuid;

use crate::error::StorageError;

/// Project CRUD.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, input: &ProjectInput) -> Result<Project, StorageError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError>;

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError>;

    /// Delete a project; documents and chunks cascade in the database.
    /// Returns `false` when no such project existed.
    async fn delete_project(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// Document lifecycle operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a `Pending` document with its content resolved at ingestion.
    #[allow(clippy::too_many_arguments)]
    async fn create_document(
        &self,
        project_id: Uuid,
        title: &str,
        file_name: &str,
        source_url: Option<&str>,
        mime_type: Option<&str>,
        size_bytes: i64,
        content: &DocumentContent,
    ) -> Result<Document, StorageError>;

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, StorageError>;

    /// Fetch the stored content as the tagged union resolved at ingestion.
    async fn get_document_content(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentContent>, StorageError>;

    async fn list_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError>;

    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<(), StorageError>;

    /// Delete a document; chunks cascade. Returns `false` when absent.
    async fn delete_document(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// Chunk persistence.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert a chunk, optionally with its embedding vector.
    ///
    /// The `(document_id, chunk_index)` pair is unique; re-processing a
    /// document must delete its chunks first.
    async fn insert_chunk(
        &self,
        chunk: &DocumentChunk,
        embedding: Option<&[f32]>,
    ) -> Result<(), StorageError>;

    /// All chunks of a document, ordered by `chunk_index`.
    async fn chunks_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentChunk>, StorageError>;

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, StorageError>;

    /// Remove all chunks of a document (used before re-processing).
    async fn delete_chunks(&self, document_id: Uuid) -> Result<u64, StorageError>;
}

/// Nearest-neighbor search over chunk embeddings.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Top-`limit` chunks by cosine similarity, above `threshold`, within
    /// `scope`. Rows without embeddings are never matched.
    async fn match_chunks(
        &self,
        query_vec: &[f32],
        threshold: f32,
        limit: usize,
        scope: &ContextScope,
    ) -> Result<Vec<ScoredChunk>, StorageError>;

    /// Unranked scan of stored chunks within `scope`, in document order,
    /// with `similarity = 0.0`. Fallback when nothing clears the threshold.
    async fn scan_chunks(
        &self,
        scope: &ContextScope,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, StorageError>;
}

/// Generated-artifact persistence, one row per ticket key.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn get_artifact(&self, ticket_key: &str)
    -> Result<Option<StoryArtifact>, StorageError>;

    /// Insert or update the canonical content column for one artifact type.
    async fn upsert_artifact_content(
        &self,
        ticket_key: &str,
        artifact_type: ArtifactType,
        content: &str,
    ) -> Result<StoryArtifact, StorageError>;
}

/// Persisted context selection (single row, replaced wholesale).
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn save_context_selection(&self, scope: &ContextScope) -> Result<(), StorageError>;

    async fn load_context_selection(&self) -> Result<Option<ContextScope>, StorageError>;
}

/// Everything a full backend provides. Blanket-implemented for any type
/// implementing the individual store traits.
pub trait Storage:
    ProjectStore + DocumentStore + ChunkStore + SimilaritySearch + ArtifactStore + ContextStore
{
}

impl<T> Storage for T where
    T: ProjectStore + DocumentStore + ChunkStore + SimilaritySearch + ArtifactStore + ContextStore
{
}
