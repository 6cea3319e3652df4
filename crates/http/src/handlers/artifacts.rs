use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use cardy_core::{ArtifactType, StoryArtifact};
use cardy_llm::prompts::TicketFields;
use cardy_service::GeneratedArtifact;

use crate::AppState;
use crate::api_error::ApiError;
use crate::handlers::resolve_scope;
use crate::query_types::GenerateRequest;

pub async fn get_artifact(
    State(state): State<Arc<AppState>>,
    Path(ticket_key): Path<String>,
) -> Result<Json<StoryArtifact>, ApiError> {
    state
        .generation
        .artifact(&ticket_key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no artifacts for ticket '{ticket_key}'")))
}

pub async fn generate_artifact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedArtifact>, ApiError> {
    let artifact_type: ArtifactType =
        req.artifact_type.parse().map_err(ApiError::BadRequest)?;
    let ticket = TicketFields {
        key: req.ticket.key,
        summary: req.ticket.summary,
        description: req.ticket.description,
        issue_type: req.ticket.issue_type,
        acceptance_criteria: req.ticket.acceptance_criteria,
    };
    let scope = resolve_scope(&state, req.scope.clone()).await?;
    let scope_ref = (!scope.is_unscoped()).then_some(&scope);
    let generated =
        state.generation.generate(&ticket, artifact_type, scope_ref, req.regenerate).await?;
    Ok(Json(generated))
}
