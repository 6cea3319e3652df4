use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use cardy_service::ChatAnswer;

use crate::AppState;
use crate::api_error::ApiError;
use crate::handlers::resolve_scope;
use crate::query_types::{ChatApiRequest, SearchRequest};
use crate::response_types::SearchResponse;

pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let limit = req.capped_limit();
    let threshold = req.checked_threshold().map_err(ApiError::BadRequest)?;
    let scope = resolve_scope(&state, req.scope.clone()).await?;
    let results = state.retrieval.search(&req.query, &scope, threshold, limit).await?;
    Ok(Json(SearchResponse { results }))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatApiRequest>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let scope = resolve_scope(&state, req.scope.clone()).await?;
    Ok(Json(state.chat.ask(&req.question, &scope, &req.history).await?))
}
