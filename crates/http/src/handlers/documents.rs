use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use cardy_core::Document;
use cardy_service::ProcessReport;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::IngestRequest;
use crate::response_types::DeleteResponse;

pub async fn ingest_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestRequest>,
) -> Result<Json<Document>, ApiError> {
    // Reject unknown projects up front; the FK error would otherwise surface
    // as an opaque 500.
    state.projects.get_project(req.project_id).await?;
    let document = state
        .ingest
        .ingest(
            req.project_id,
            &req.title,
            &req.file_name,
            req.source_url.as_deref(),
            req.mime_type.as_deref(),
            req.size_bytes,
            &req.content,
        )
        .await?;
    Ok(Json(document))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.projects.get_document(id).await?))
}

pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.projects.delete_document(id).await?;
    Ok(Json(DeleteResponse { deleted: true, id }))
}

pub async fn process_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProcessReport>, ApiError> {
    Ok(Json(state.ingest.process(id).await?))
}
