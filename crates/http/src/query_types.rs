//! Request/query types (Deserialize)

use cardy_core::{
    ContextScope, DEFAULT_MATCH_COUNT, DEFAULT_SIMILARITY_THRESHOLD, DocumentContent,
    MAX_QUERY_LIMIT, ProjectType,
};
use cardy_llm::Message;
use serde::Deserialize;
use uuid::Uuid;

const fn default_match_count() -> usize {
    DEFAULT_MATCH_COUNT
}

const fn default_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_project_type() -> ProjectType {
    ProjectType::General
}

/// Scope fields shared by search, chat, and generation request bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeParams {
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
}

impl ScopeParams {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.document_ids.is_empty()
    }

    pub fn into_scope(self) -> ContextScope {
        ContextScope { project_id: self.project_id, document_ids: self.document_ids }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default = "default_project_type")]
    pub project_type: ProjectType,
    pub details: Option<String>,
    pub source_url: Option<String>,
    pub drive_url: Option<String>,
    pub tracker_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub project_id: Uuid,
    pub title: String,
    pub file_name: String,
    pub source_url: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: i64,
    pub content: DocumentContent,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_match_count")]
    pub limit: usize,
}

impl SearchRequest {
    /// Cap limit to prevent DoS via unbounded queries.
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_QUERY_LIMIT)
    }

    /// Similarity threshold, rejected when outside the cosine range.
    ///
    /// Values below 0 silently relax the filter and values above 1 empty
    /// every result set, so both are caller errors.
    pub fn checked_threshold(&self) -> Result<f32, String> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(self.threshold)
        } else {
            Err(format!("threshold must be between 0 and 1, got {}", self.threshold))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    pub question: String,
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(default)]
    pub history: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct TicketPayload {
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub issue_type: Option<String>,
    pub acceptance_criteria: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub ticket: TicketPayload,
    pub artifact_type: String,
    #[serde(flatten)]
    pub scope: ScopeParams,
    #[serde(default)]
    pub regenerate: bool,
}

#[derive(Debug, Deserialize)]
pub struct ContextUpdateRequest {
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
}
