use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use cardy_jira::{JiraProject, JiraSprint, JiraTicket};

use crate::AppState;
use crate::api_error::ApiError;
use crate::handlers::jira_client;

pub async fn list_jira_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<JiraProject>>, ApiError> {
    Ok(Json(jira_client(&state)?.list_projects().await?))
}

pub async fn board_sprints(
    State(state): State<Arc<AppState>>,
    Path(board_id): Path<i64>,
) -> Result<Json<Vec<JiraSprint>>, ApiError> {
    Ok(Json(jira_client(&state)?.list_sprints(board_id).await?))
}

pub async fn sprint_tickets(
    State(state): State<Arc<AppState>>,
    Path(sprint_id): Path<i64>,
) -> Result<Json<Vec<JiraTicket>>, ApiError> {
    Ok(Json(jira_client(&state)?.sprint_tickets(sprint_id).await?))
}
