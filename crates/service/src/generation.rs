//! Artifact generation for tracker tickets.
//!
//! One ticket accumulates up to four artifacts (design, code, tests, manual
//! test cases). Generation is idempotent: existing content is returned as-is
//! unless the caller explicitly regenerates, and concurrent requests for the
//! same ticket are serialized so a double-click never bills two completions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use cardy_core::{ArtifactType, ContextScope, DEFAULT_MATCH_COUNT, DEFAULT_SIMILARITY_THRESHOLD};
use cardy_llm::prompts::{self, TicketFields};
use cardy_llm::{ChatRequest, CompletionProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use cardy_storage::traits::Storage;

use crate::ServiceError;
use crate::assembler::assemble;
use crate::retrieval::RetrievalService;

/// One generated (or reused) artifact.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratedArtifact {
    pub ticket_key: String,
    pub artifact_type: ArtifactType,
    pub content: String,
    /// True when existing content was returned without a completion call.
    pub reused: bool,
}

pub struct GenerationService {
    storage: Arc<dyn Storage>,
    retrieval: Arc<RetrievalService>,
    llm: Arc<dyn CompletionProvider>,
    ticket_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GenerationService {
    pub fn new(
        storage: Arc<dyn Storage>,
        retrieval: Arc<RetrievalService>,
        llm: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self { storage, retrieval, llm, ticket_locks: Mutex::new(HashMap::new()) }
    }

    /// Stored artifact row for a ticket, if any generation has happened.
    pub async fn artifact(
        &self,
        ticket_key: &str,
    ) -> Result<Option<cardy_core::StoryArtifact>, ServiceError> {
        Ok(self.storage.get_artifact(ticket_key).await?)
    }

    async fn lock_for_ticket(&self, ticket_key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.ticket_locks.lock().await;
        locks.entry(ticket_key.to_owned()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    /// Drop the map entry once no other caller holds a clone of it, so the
    /// map does not grow by one entry per distinct ticket key forever.
    async fn release_ticket_lock(&self, ticket_key: &str) {
        let mut locks = self.ticket_locks.lock().await;
        // Map entry plus our local clone: strong count 2 means no waiters.
        if locks.get(ticket_key).is_some_and(|entry| Arc::strong_count(entry) == 2) {
            locks.remove(ticket_key);
        }
    }

    /// Generate one artifact for a ticket, or return the stored one.
    ///
    /// Without `regenerate`, existing content short-circuits before any
    /// completion request. Upstream artifacts already stored for the ticket
    /// (design feeds code, code feeds tests) are folded into the prompt.
    pub async fn generate(
        &self,
        ticket: &TicketFields,
        artifact_type: ArtifactType,
        scope: Option<&ContextScope>,
        regenerate: bool,
    ) -> Result<GeneratedArtifact, ServiceError> {
        if ticket.key.trim().is_empty() {
            return Err(ServiceError::InvalidInput("ticket key must not be empty".into()));
        }

        let ticket_lock = self.lock_for_ticket(&ticket.key).await;
        let guard = ticket_lock.lock().await;
        let result = self.generate_locked(ticket, artifact_type, scope, regenerate).await;
        drop(guard);
        self.release_ticket_lock(&ticket.key).await;
        result
    }

    async fn generate_locked(
        &self,
        ticket: &TicketFields,
        artifact_type: ArtifactType,
        scope: Option<&ContextScope>,
        regenerate: bool,
    ) -> Result<GeneratedArtifact, ServiceError> {
        let existing = self.storage.get_artifact(&ticket.key).await?;
        if !regenerate {
            if let Some(content) = existing.as_ref().and_then(|a| a.content_for(artifact_type)) {
                tracing::debug!(
                    ticket_key = %ticket.key,
                    artifact_type = artifact_type.as_str(),
                    "returning stored artifact"
                );
                return Ok(GeneratedArtifact {
                    ticket_key: ticket.key.clone(),
                    artifact_type,
                    content: content.to_owned(),
                    reused: true,
                });
            }
        }

        let context_block = match scope {
            Some(scope) if !scope.is_unscoped() => {
                let query = format!("{} {}", ticket.summary, ticket.description);
                let chunks = self
                    .retrieval
                    .search(&query, scope, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_MATCH_COUNT)
                    .await?;
                let assembled = assemble(&chunks);
                (!assembled.is_empty()).then_some(assembled.block)
            },
            _ => None,
        };

        let upstream: Vec<(ArtifactType, String)> = artifact_type
            .upstream()
            .iter()
            .filter_map(|t| {
                existing
                    .as_ref()
                    .and_then(|a| a.content_for(*t))
                    .map(|content| (*t, content.to_owned()))
            })
            .collect();

        let request = ChatRequest {
            model: self.llm.model().to_owned(),
            messages: prompts::artifact_messages(
                ticket,
                artifact_type,
                context_block.as_deref(),
                &upstream,
            ),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };
        let completion = self.llm.chat_completion(&request).await?;

        self.storage
            .upsert_artifact_content(&ticket.key, artifact_type, &completion.content)
            .await?;
        tracing::info!(
            ticket_key = %ticket.key,
            artifact_type = artifact_type.as_str(),
            regenerate,
            "artifact generated"
        );

        Ok(GeneratedArtifact {
            ticket_key: ticket.key.clone(),
            artifact_type,
            content: completion.content,
            reused: false,
        })
    }
}
