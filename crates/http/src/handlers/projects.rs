use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use cardy_core::{Document, Project, ProjectInput};

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::CreateProjectRequest;
use crate::response_types::DeleteResponse;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let input = ProjectInput {
        name: req.name,
        project_type: req.project_type,
        details: req.details,
        source_url: req.source_url,
        drive_url: req.drive_url,
        tracker_url: req.tracker_url,
    };
    Ok(Json(state.projects.create_project(&input).await?))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list_projects().await?))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.get_project(id).await?))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.projects.delete_project(id).await?;
    Ok(Json(DeleteResponse { deleted: true, id }))
}

pub async fn list_project_documents(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Document>>, ApiError> {
    // 404 for an unknown project instead of an empty list.
    state.projects.get_project(id).await?;
    Ok(Json(state.projects.list_documents(id).await?))
}
