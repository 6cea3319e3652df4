use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use cardy_core::ContextScope;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::ContextUpdateRequest;

pub async fn get_context(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ContextScope>, ApiError> {
    Ok(Json(state.projects.load_context().await?))
}

pub async fn put_context(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContextUpdateRequest>,
) -> Result<Json<ContextScope>, ApiError> {
    if req.project_id.is_none() && !req.document_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "document selection requires a project_id".to_owned(),
        ));
    }
    let scope = ContextScope { project_id: req.project_id, document_ids: req.document_ids };
    state.projects.save_context(&scope).await?;
    Ok(Json(scope))
}
