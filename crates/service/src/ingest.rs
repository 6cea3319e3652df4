//! Document ingestion and processing.
//!
//! Ingestion stores the document with its resolved content and leaves it
//! `Pending`. Processing chunks the text and fans the chunks out to the
//! embeddings API with bounded concurrency; each chunk keeps its original
//! index no matter which order the embeddings come back in.

use std::sync::Arc;

use futures_util::StreamExt;
use uuid::Uuid;

use cardy_core::{
    DEFAULT_CHUNK_MAX_CHARS, Document, DocumentChunk, DocumentContent, DocumentStatus,
    EMBED_CONCURRENCY, chunk_text, detect_language,
};
use cardy_embeddings::EmbeddingProvider;
use cardy_storage::traits::Storage;

use crate::ServiceError;

/// Outcome of processing one document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessReport {
    pub document_id: Uuid,
    pub total_chunks: usize,
    pub stored_chunks: usize,
    pub status: DocumentStatus,
}

pub struct IngestService {
    storage: Arc<dyn Storage>,
    embeddings: Arc<dyn EmbeddingProvider>,
}

impl IngestService {
    pub fn new(storage: Arc<dyn Storage>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self { storage, embeddings }
    }

    /// Store an uploaded document as `Pending`.
    ///
    /// Content is validated here, before anything is persisted or any
    /// external API is called.
    #[allow(clippy::too_many_arguments)]
    pub async fn ingest(
        &self,
        project_id: Uuid,
        title: &str,
        file_name: &str,
        source_url: Option<&str>,
        mime_type: Option<&str>,
        size_bytes: i64,
        content: &DocumentContent,
    ) -> Result<Document, ServiceError> {
        if title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("document title must not be empty".into()));
        }
        if content.is_empty() {
            return Err(ServiceError::InvalidInput("document content must not be empty".into()));
        }
        let document = self
            .storage
            .create_document(project_id, title, file_name, source_url, mime_type, size_bytes, content)
            .await?;
        tracing::info!(document_id = %document.id, %project_id, "document ingested");
        Ok(document)
    }

    /// Chunk, embed, and persist one document's content.
    ///
    /// Final status is `Completed` only when every chunk was embedded and
    /// stored; `PartialFailure` when some were; `Failed` when none were.
    pub async fn process(&self, document_id: Uuid) -> Result<ProcessReport, ServiceError> {
        let document = self.storage.get_document(document_id).await?.ok_or_else(|| {
            ServiceError::Storage(cardy_storage::StorageError::NotFound {
                entity: "document",
                id: document_id.to_string(),
            })
        })?;
        let content =
            self.storage.get_document_content(document_id).await?.ok_or_else(|| {
                ServiceError::InvalidInput(format!("document {document_id} has no stored content"))
            })?;

        self.storage.set_document_status(document_id, DocumentStatus::Processing).await?;

        let text = content.as_text();
        let segments = chunk_text(&text, DEFAULT_CHUNK_MAX_CHARS);
        if segments.is_empty() {
            self.storage.set_document_status(document_id, DocumentStatus::Failed).await?;
            return Err(ServiceError::InvalidInput(format!(
                "document {document_id} produced no chunks"
            )));
        }
        let total = segments.len();

        // Re-processing replaces chunks wholesale; stale rows would violate
        // the unique (document_id, chunk_index) constraint.
        self.storage.delete_chunks(document_id).await?;

        let storage = &self.storage;
        let embeddings = &self.embeddings;
        let project_id = document.project_id;
        let language = detect_language(&document.file_name);
        let stored: usize = futures_util::stream::iter(segments.into_iter().enumerate())
            .map(|(index, segment)| async move {
                let chunk = DocumentChunk {
                    id: Uuid::new_v4(),
                    document_id,
                    project_id,
                    chunk_index: i32::try_from(index).unwrap_or(i32::MAX),
                    text: segment,
                    metadata: serde_json::json!({"language": language}),
                };
                match embeddings.embed(&chunk.text).await {
                    Ok(vector) => match storage.insert_chunk(&chunk, Some(&vector)).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(%document_id, index, error = %e, "chunk insert failed");
                            false
                        },
                    },
                    Err(e) => {
                        tracing::warn!(%document_id, index, error = %e, "chunk embedding failed");
                        false
                    },
                }
            })
            .buffer_unordered(EMBED_CONCURRENCY)
            .collect::<Vec<bool>>()
            .await
            .into_iter()
            .filter(|ok| *ok)
            .count();

        let status = if stored == total {
            DocumentStatus::Completed
        } else if stored > 0 {
            DocumentStatus::PartialFailure
        } else {
            DocumentStatus::Failed
        };
        self.storage.set_document_status(document_id, status).await?;
        tracing::info!(%document_id, total, stored, status = status.as_str(), "document processed");

        Ok(ProcessReport { document_id, total_chunks: total, stored_chunks: stored, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailEveryOther, FakeEmbeddings, FakeStorage};
    use cardy_core::ProjectType;
    use cardy_storage::traits::{ChunkStore, DocumentStore};

    fn raw(text: &str) -> DocumentContent {
        DocumentContent::Raw(text.to_owned())
    }

    #[tokio::test]
    async fn ingest_rejects_empty_content() {
        let storage = Arc::new(FakeStorage::default());
        let service = IngestService::new(storage.clone(), Arc::new(FakeEmbeddings::default()));
        let project = storage.seed_project("p1", ProjectType::General).await;

        let err = service
            .ingest(project, "doc", "doc.txt", None, None, 0, &raw("   \n "))
            .await
            .expect_err("empty content must be rejected");
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(storage.document_count().await, 0, "nothing should be persisted");
    }

    #[tokio::test]
    async fn ingest_preserves_title_file_name_and_source() {
        let storage = Arc::new(FakeStorage::default());
        let service = IngestService::new(storage.clone(), Arc::new(FakeEmbeddings::default()));
        let project = storage.seed_project("p1", ProjectType::General).await;

        let doc = service
            .ingest(
                project,
                "Requirements",
                "requirements.docx",
                Some("https://drive.example/req"),
                Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
                1024,
                &raw("some text"),
            )
            .await
            .unwrap();

        let fetched = storage.get_document(doc.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Requirements");
        assert_eq!(fetched.file_name, "requirements.docx");
        assert_eq!(fetched.source_url.as_deref(), Some("https://drive.example/req"));
        assert_eq!(fetched.status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn process_stores_one_chunk_per_segment_with_contiguous_indices() {
        let storage = Arc::new(FakeStorage::default());
        let service = IngestService::new(storage.clone(), Arc::new(FakeEmbeddings::default()));
        let project = storage.seed_project("p1", ProjectType::General).await;

        // Three paragraphs, each well under the chunk limit, far apart enough
        // to land in separate chunks.
        let text = format!("{}\n\n{}\n\n{}", "a".repeat(1500), "b".repeat(1500), "c".repeat(1500));
        let doc = service.ingest(project, "doc", "doc.txt", None, None, 0, &raw(&text)).await.unwrap();

        let report = service.process(doc.id).await.unwrap();
        assert_eq!(report.total_chunks, 3);
        assert_eq!(report.stored_chunks, 3);
        assert_eq!(report.status, DocumentStatus::Completed);

        let chunks = storage.chunks_for_document(doc.id).await.unwrap();
        let indices: Vec<i32> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2], "indices must be contiguous from zero");
    }

    #[tokio::test]
    async fn process_reports_partial_failure_when_some_embeddings_fail() {
        let storage = Arc::new(FakeStorage::default());
        let service = IngestService::new(storage.clone(), Arc::new(FailEveryOther::default()));
        let project = storage.seed_project("p1", ProjectType::General).await;

        let text = format!("{}\n\n{}", "a".repeat(1500), "b".repeat(1500));
        let doc = service.ingest(project, "doc", "doc.txt", None, None, 0, &raw(&text)).await.unwrap();

        let report = service.process(doc.id).await.unwrap();
        assert_eq!(report.total_chunks, 2);
        assert_eq!(report.stored_chunks, 1);
        assert_eq!(report.status, DocumentStatus::PartialFailure);

        let fetched = storage.get_document(doc.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DocumentStatus::PartialFailure);
    }

    #[tokio::test]
    async fn reprocessing_replaces_chunks_instead_of_appending() {
        let storage = Arc::new(FakeStorage::default());
        let service = IngestService::new(storage.clone(), Arc::new(FakeEmbeddings::default()));
        let project = storage.seed_project("p1", ProjectType::General).await;

        let doc =
            service.ingest(project, "doc", "doc.txt", None, None, 0, &raw("short text")).await.unwrap();
        service.process(doc.id).await.unwrap();
        service.process(doc.id).await.unwrap();

        assert_eq!(storage.count_chunks(doc.id).await.unwrap(), 1);
    }
}
