//! Service layer for cardy.
//!
//! Centralizes business logic between HTTP handlers and storage/embeddings/llm:
//! document ingestion and processing, scoped retrieval, context assembly,
//! grounded chat, and ticket artifact generation.

pub mod assembler;
mod chat;
mod error;
mod generation;
mod ingest;
mod project_service;
mod retrieval;

#[cfg(test)]
mod test_support;

pub use assembler::{AssembledContext, assemble};
pub use chat::{ChatAnswer, ChatService};
pub use error::ServiceError;
pub use generation::{GeneratedArtifact, GenerationService};
pub use ingest::{IngestService, ProcessReport};
pub use project_service::ProjectService;
pub use retrieval::RetrievalService;
