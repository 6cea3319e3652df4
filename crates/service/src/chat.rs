//! Document-grounded chat ("Cardy Mind").
//!
//! A chat turn is retrieval, context assembly, and one completion call. The
//! sources that fed the answer come back alongside it for citation display.

use std::sync::Arc;

use cardy_core::{ContextScope, DEFAULT_MATCH_COUNT, DEFAULT_SIMILARITY_THRESHOLD};
use cardy_llm::{
    ChatRequest, CompletionProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, Message, prompts,
};

use crate::ServiceError;
use crate::assembler::assemble;
use crate::retrieval::RetrievalService;

/// An answer plus the documents whose chunks backed it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

pub struct ChatService {
    retrieval: Arc<RetrievalService>,
    llm: Arc<dyn CompletionProvider>,
}

impl ChatService {
    pub fn new(retrieval: Arc<RetrievalService>, llm: Arc<dyn CompletionProvider>) -> Self {
        Self { retrieval, llm }
    }

    /// Answer a question from the documents in `scope`.
    ///
    /// When retrieval yields nothing the completion still runs, with the
    /// prompt stating that no context is available, so the model says so
    /// instead of inventing an answer.
    pub async fn ask(
        &self,
        question: &str,
        scope: &ContextScope,
        history: &[Message],
    ) -> Result<ChatAnswer, ServiceError> {
        if question.trim().is_empty() {
            return Err(ServiceError::InvalidInput("question must not be empty".into()));
        }

        let chunks = self
            .retrieval
            .search(question, scope, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_MATCH_COUNT)
            .await?;
        let context = assemble(&chunks);
        let block = if context.is_empty() { None } else { Some(context.block.as_str()) };

        let request = ChatRequest {
            model: self.llm.model().to_owned(),
            messages: prompts::chat_messages(block, history, question),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };
        let completion = self.llm.chat_completion(&request).await?;
        tracing::debug!(
            sources = context.sources.len(),
            prompt_tokens = completion.usage.prompt_tokens,
            "chat turn completed"
        );

        Ok(ChatAnswer { answer: completion.content, sources: context.sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingLlm, FakeEmbeddings, FakeStorage};
    use cardy_core::{DocumentChunk, DocumentContent, ProjectType};
    use cardy_storage::traits::{ChunkStore, DocumentStore};
    use uuid::Uuid;

    async fn service_with_one_chunk(
        text: &str,
    ) -> (ChatService, Arc<CountingLlm>, ContextScope) {
        let storage = Arc::new(FakeStorage::default());
        let project = storage.seed_project("p1", ProjectType::General).await;
        let doc = storage
            .create_document(
                project,
                "handbook.md",
                "handbook.md",
                None,
                None,
                0,
                &DocumentContent::Raw(text.to_owned()),
            )
            .await
            .unwrap();
        storage
            .insert_chunk(
                &DocumentChunk {
                    id: Uuid::new_v4(),
                    document_id: doc.id,
                    project_id: project,
                    chunk_index: 0,
                    text: text.to_owned(),
                    metadata: serde_json::json!({}),
                },
                Some(&[1.0, 0.0, 0.0]),
            )
            .await
            .unwrap();

        let retrieval =
            Arc::new(RetrievalService::new(storage, Arc::new(FakeEmbeddings::default())));
        let llm = Arc::new(CountingLlm::new("the answer"));
        (ChatService::new(retrieval, llm.clone()), llm, ContextScope::project(project))
    }

    #[tokio::test]
    async fn ask_surfaces_answer_and_sources() {
        let (service, llm, scope) = service_with_one_chunk("vacation policy is 25 days").await;

        let answer = service.ask("how many vacation days", &scope, &[]).await.unwrap();
        assert_eq!(answer.answer, "the answer");
        assert_eq!(answer.sources, vec!["handbook.md"]);
        assert_eq!(llm.call_count(), 1);

        let request = llm.last_request.lock().await.clone().unwrap();
        let user = &request.messages.last().unwrap().content;
        assert!(user.contains("vacation policy is 25 days"), "context must reach the prompt");
        assert!(user.contains("=== Document: handbook.md ==="));
    }

    #[tokio::test]
    async fn ask_without_context_states_absence_in_prompt() {
        let storage = Arc::new(FakeStorage::default());
        let project = storage.seed_project("empty", ProjectType::General).await;
        let retrieval =
            Arc::new(RetrievalService::new(storage, Arc::new(FakeEmbeddings::default())));
        let llm = Arc::new(CountingLlm::new("I don't know"));
        let service = ChatService::new(retrieval, llm.clone());

        let answer =
            service.ask("anything", &ContextScope::project(project), &[]).await.unwrap();
        assert!(answer.sources.is_empty());

        let request = llm.last_request.lock().await.clone().unwrap();
        let user = &request.messages.last().unwrap().content;
        assert!(user.contains("No document context is available"));
    }

    #[tokio::test]
    async fn ask_threads_history_through_the_prompt() {
        let (service, llm, scope) = service_with_one_chunk("some text").await;
        let history = vec![Message::user("earlier question"), Message::assistant("earlier answer")];

        service.ask("follow-up", &scope, &history).await.unwrap();

        let request = llm.last_request.lock().await.clone().unwrap();
        // system + 2 history + final user
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[1].content, "earlier question");
    }

    #[tokio::test]
    async fn ask_rejects_empty_question() {
        let (service, llm, scope) = service_with_one_chunk("text").await;
        let err = service.ask("  ", &scope, &[]).await.expect_err("empty question");
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(llm.call_count(), 0);
    }
}
