//! In-memory fakes shared by the service unit tests.

#![allow(clippy::unwrap_used, reason = "test support code")]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use cardy_core::{
    ArtifactType, ContextScope, Document, DocumentChunk, DocumentContent, DocumentStatus, Project,
    ProjectInput, ProjectType, ScoredChunk, StoryArtifact,
};
use cardy_embeddings::{EmbeddingError, EmbeddingProvider};
use cardy_llm::{ChatRequest, Completion, CompletionProvider, LlmError, TokenUsage};
use cardy_storage::StorageError;
use cardy_storage::traits::{
    ArtifactStore, ChunkStore, ContextStore, DocumentStore, ProjectStore, SimilaritySearch,
};

#[derive(Default)]
struct FakeState {
    projects: HashMap<Uuid, Project>,
    documents: HashMap<Uuid, (Document, DocumentContent)>,
    chunks: Vec<(DocumentChunk, Option<Vec<f32>>)>,
    artifacts: HashMap<String, StoryArtifact>,
    context: Option<ContextScope>,
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct FakeStorage {
    state: Mutex<FakeState>,
}

impl FakeStorage {
    pub async fn seed_project(&self, name: &str, project_type: ProjectType) -> Uuid {
        let id = Uuid::new_v4();
        let project = Project {
            id,
            name: name.to_owned(),
            project_type,
            details: None,
            source_url: None,
            drive_url: None,
            tracker_url: None,
            created_at: Utc::now(),
        };
        self.state.lock().await.projects.insert(id, project);
        id
    }

    pub async fn document_count(&self) -> usize {
        self.state.lock().await.documents.len()
    }

    pub async fn seed_artifact(&self, ticket_key: &str, artifact_type: ArtifactType, content: &str) {
        let mut state = self.state.lock().await;
        let artifact = state
            .artifacts
            .entry(ticket_key.to_owned())
            .or_insert_with(|| StoryArtifact::empty(ticket_key));
        artifact.set_content(artifact_type, content.to_owned());
    }
}

fn in_scope(chunk: &DocumentChunk, scope: &ContextScope) -> bool {
    if let Some(project_id) = scope.project_id {
        if chunk.project_id != project_id {
            return false;
        }
    }
    if !scope.document_ids.is_empty() && !scope.document_ids.contains(&chunk.document_id) {
        return false;
    }
    true
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

#[async_trait]
impl ProjectStore for FakeStorage {
    async fn create_project(&self, input: &ProjectInput) -> Result<Project, StorageError> {
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            project_type: input.project_type,
            details: input.details.clone(),
            source_url: input.source_url.clone(),
            drive_url: input.drive_url.clone(),
            tracker_url: input.tracker_url.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().await.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, StorageError> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        Ok(self.state.lock().await.projects.values().cloned().collect())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        let existed = state.projects.remove(&id).is_some();
        state.documents.retain(|_, (doc, _)| doc.project_id != id);
        state.chunks.retain(|(chunk, _)| chunk.project_id != id);
        Ok(existed)
    }
}

#[async_trait]
impl DocumentStore for FakeStorage {
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
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            project_id,
            title: title.to_owned(),
            file_name: file_name.to_owned(),
            source_url: source_url.map(str::to_owned),
            mime_type: mime_type.map(str::to_owned),
            size_bytes,
            status: DocumentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.documents.insert(document.id, (document.clone(), content.clone()));
        Ok(document)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<Document>, StorageError> {
        Ok(self.state.lock().await.documents.get(&id).map(|(doc, _)| doc.clone()))
    }

    async fn get_document_content(
        &self,
        id: Uuid,
    ) -> Result<Option<DocumentContent>, StorageError> {
        Ok(self.state.lock().await.documents.get(&id).map(|(_, content)| content.clone()))
    }

    async fn list_documents(&self, project_id: Uuid) -> Result<Vec<Document>, StorageError> {
        Ok(self
            .state
            .lock()
            .await
            .documents
            .values()
            .filter(|(doc, _)| doc.project_id == project_id)
            .map(|(doc, _)| doc.clone())
            .collect())
    }

    async fn set_document_status(
        &self,
        id: Uuid,
        status: DocumentStatus,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let (doc, _) = state
            .documents
            .get_mut(&id)
            .ok_or(StorageError::NotFound { entity: "document", id: id.to_string() })?;
        doc.status = status;
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_document(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut state = self.state.lock().await;
        let existed = state.documents.remove(&id).is_some();
        state.chunks.retain(|(chunk, _)| chunk.document_id != id);
        Ok(existed)
    }
}

#[async_trait]
impl ChunkStore for FakeStorage {
    async fn insert_chunk(
        &self,
        chunk: &DocumentChunk,
        embedding: Option<&[f32]>,
    ) -> Result<(), StorageError> {
        let mut state = self.state.lock().await;
        let duplicate = state
            .chunks
            .iter()
            .any(|(c, _)| c.document_id == chunk.document_id && c.chunk_index == chunk.chunk_index);
        if duplicate {
            return Err(StorageError::Duplicate(format!(
                "chunk index {} for document {}",
                chunk.chunk_index, chunk.document_id
            )));
        }
        state.chunks.push((chunk.clone(), embedding.map(<[f32]>::to_vec)));
        Ok(())
    }

    async fn chunks_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<DocumentChunk>, StorageError> {
        let state = self.state.lock().await;
        let mut chunks: Vec<DocumentChunk> = state
            .chunks
            .iter()
            .filter(|(c, _)| c.document_id == document_id)
            .map(|(c, _)| c.clone())
            .collect();
        chunks.sort_by_key(|c| c.chunk_index);
        Ok(chunks)
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<i64, StorageError> {
        let state = self.state.lock().await;
        Ok(state.chunks.iter().filter(|(c, _)| c.document_id == document_id).count() as i64)
    }

    async fn delete_chunks(&self, document_id: Uuid) -> Result<u64, StorageError> {
        let mut state = self.state.lock().await;
        let before = state.chunks.len();
        state.chunks.retain(|(c, _)| c.document_id != document_id);
        Ok((before - state.chunks.len()) as u64)
    }
}

#[async_trait]
impl SimilaritySearch for FakeStorage {
    async fn match_chunks(
        &self,
        query_vec: &[f32],
        threshold: f32,
        limit: usize,
        scope: &ContextScope,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        let state = self.state.lock().await;
        let mut scored: Vec<ScoredChunk> = state
            .chunks
            .iter()
            .filter(|(c, emb)| emb.is_some() && in_scope(c, scope))
            .filter_map(|(c, emb)| {
                let similarity = cosine(query_vec, emb.as_deref().unwrap());
                (similarity >= threshold).then(|| ScoredChunk {
                    document_id: c.document_id,
                    document_name: state
                        .documents
                        .get(&c.document_id)
                        .map_or_else(String::new, |(d, _)| d.title.clone()),
                    chunk_index: c.chunk_index,
                    text: c.text.clone(),
                    similarity,
                })
            })
            .collect();
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn scan_chunks(
        &self,
        scope: &ContextScope,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, StorageError> {
        let state = self.state.lock().await;
        let mut scanned: Vec<ScoredChunk> = state
            .chunks
            .iter()
            .filter(|(c, _)| in_scope(c, scope))
            .map(|(c, _)| ScoredChunk {
                document_id: c.document_id,
                document_name: state
                    .documents
                    .get(&c.document_id)
                    .map_or_else(String::new, |(d, _)| d.title.clone()),
                chunk_index: c.chunk_index,
                text: c.text.clone(),
                similarity: 0.0,
            })
            .collect();
        scanned.sort_by_key(|c| (c.document_id, c.chunk_index));
        scanned.truncate(limit);
        Ok(scanned)
    }
}

#[async_trait]
impl ArtifactStore for FakeStorage {
    async fn get_artifact(
        &self,
        ticket_key: &str,
    ) -> Result<Option<StoryArtifact>, StorageError> {
        Ok(self.state.lock().await.artifacts.get(ticket_key).cloned())
    }

    async fn upsert_artifact_content(
        &self,
        ticket_key: &str,
        artifact_type: ArtifactType,
        content: &str,
    ) -> Result<StoryArtifact, StorageError> {
        let mut state = self.state.lock().await;
        let artifact = state
            .artifacts
            .entry(ticket_key.to_owned())
            .or_insert_with(|| StoryArtifact::empty(ticket_key));
        artifact.set_content(artifact_type, content.to_owned());
        Ok(artifact.clone())
    }
}

#[async_trait]
impl ContextStore for FakeStorage {
    async fn save_context_selection(&self, scope: &ContextScope) -> Result<(), StorageError> {
        self.state.lock().await.context = Some(scope.clone());
        Ok(())
    }

    async fn load_context_selection(&self) -> Result<Option<ContextScope>, StorageError> {
        Ok(self.state.lock().await.context.clone())
    }
}

/// Embeds every text as the same unit vector, so every chunk matches every
/// query with similarity 1.0.
#[derive(Default)]
pub struct FakeEmbeddings {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddings {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1.0, 0.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
    }
}

/// Fails every second `embed` call, starting with a success.
#[derive(Default)]
pub struct FailEveryOther {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for FailEveryOther {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 2 == 0 {
            Ok(vec![1.0, 0.0, 0.0])
        } else {
            Err(EmbeddingError::HttpStatus { code: 500, body: "synthetic failure".to_owned() })
        }
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::HttpStatus { code: 500, body: "synthetic failure".to_owned() })
    }
}

/// Counts completion calls and records the last request for prompt assertions.
pub struct CountingLlm {
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<ChatRequest>>,
    response: String,
}

impl CountingLlm {
    pub fn new(response: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            response: response.to_owned(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for CountingLlm {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(request.clone());
        Ok(Completion { content: self.response.clone(), usage: TokenUsage::default() })
    }

    fn model(&self) -> &str {
        "counting-fake"
    }
}
