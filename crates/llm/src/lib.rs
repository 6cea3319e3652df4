//! LLM integration: chat-completion client and prompt builders.

mod ai_types;
mod client;
mod error;
pub mod prompts;

pub use ai_types::{ChatRequest, Completion, Message, Role, TokenUsage};
pub use client::{
    CompletionProvider, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, LlmClient,
    truncate,
};
pub use error::LlmError;
