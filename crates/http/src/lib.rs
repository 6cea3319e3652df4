//! HTTP API server for cardy.

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use cardy_jira::JiraClient;
use cardy_service::{
    ChatService, GenerationService, IngestService, ProjectService, RetrievalService,
};

pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
///
/// Contains service instances, wrapped in `Arc` for thread-safe sharing
/// across handlers.
pub struct AppState {
    pub projects: Arc<ProjectService>,
    pub ingest: Arc<IngestService>,
    pub retrieval: Arc<RetrievalService>,
    pub chat: Arc<ChatService>,
    pub generation: Arc<GenerationService>,
    /// Absent when tracker credentials are not configured; the Jira routes
    /// answer 503 in that case.
    pub jira: Option<Arc<JiraClient>>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route(
            "/api/projects",
            post(handlers::projects::create_project).get(handlers::projects::list_projects),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get_project).delete(handlers::projects::delete_project),
        )
        .route("/api/projects/{id}/documents", get(handlers::projects::list_project_documents))
        .route("/api/documents", post(handlers::documents::ingest_document))
        .route(
            "/api/documents/{id}",
            get(handlers::documents::get_document).delete(handlers::documents::delete_document),
        )
        .route("/api/documents/{id}/process", post(handlers::documents::process_document))
        .route("/api/search", post(handlers::search::search))
        .route("/api/chat", post(handlers::search::chat))
        .route(
            "/api/context",
            get(handlers::context::get_context).put(handlers::context::put_context),
        )
        .route("/api/artifacts/generate", post(handlers::artifacts::generate_artifact))
        .route("/api/artifacts/{ticket_key}", get(handlers::artifacts::get_artifact))
        .route("/api/jira/projects", get(handlers::jira::list_jira_projects))
        .route("/api/jira/boards/{id}/sprints", get(handlers::jira::board_sprints))
        .route("/api/jira/sprints/{id}/tickets", get(handlers::jira::sprint_tickets))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
