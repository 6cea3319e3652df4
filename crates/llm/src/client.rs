use crate::ai_types::{ChatRequest, ChatResponse, Completion};
use crate::error::LlmError;

/// Default chat model to use.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature for generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default output budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

const MAX_RETRIES: usize = 3;
const RETRY_DELAYS_SECS: [u64; 4] = [0, 1, 2, 4];

/// Abstraction over chat completion, so orchestration logic can be tested
/// with a counting fake instead of a live provider.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Completion, LlmError>;

    /// The model name requests default to.
    fn model(&self) -> &str;
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a new LLM client with the given API key and base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(api_key: String, base_url: String) -> Result<Self, LlmError> {
        let model = std::env::var("CARDY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::ClientInit(e.to_string()))?;
        Ok(Self { client, api_key, base_url, model })
    }

    /// Sets a custom model for this client.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

#[async_trait::async_trait]
impl CompletionProvider for LlmClient {
    /// Send a chat completion request.
    ///
    /// Transient failures (transport, 429/5xx) are retried on a fixed backoff
    /// schedule; non-transient provider errors are surfaced immediately with
    /// the provider's body text.
    async fn chat_completion(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_secs = RETRY_DELAYS_SECS.get(attempt).copied().unwrap_or(4);
                tokio::time::sleep(std::time::Duration::from_secs(delay_secs)).await;
                tracing::warn!("LLM retry attempt {attempt}/{MAX_RETRIES}");
            }

            let response_result = self
                .client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(request)
                .send()
                .await;

            let response = match response_result {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::HttpRequest(e));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(LlmError::HttpRequest(e));
                        continue;
                    },
                };

                let chat_response: ChatResponse =
                    serde_json::from_str(&body).map_err(|e| LlmError::JsonParse {
                        context: format!(
                            "chat completion response (body: {})",
                            truncate(&body, 200)
                        ),
                        source: e,
                    })?;

                let first_choice =
                    chat_response.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
                return Ok(Completion {
                    content: first_choice.message.content,
                    usage: chat_response.usage.unwrap_or_default(),
                });
            }

            let code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "could not read error body".to_owned());
            let err = LlmError::HttpStatus { code, body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(LlmError::RetriesExhausted(Box::new(last_error.unwrap_or(LlmError::EmptyResponse))))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
