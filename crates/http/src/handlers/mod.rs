pub mod artifacts;
pub mod context;
pub mod documents;
pub mod jira;
pub mod projects;
pub mod search;

use std::sync::Arc;

use cardy_core::ContextScope;
use cardy_jira::JiraClient;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::ScopeParams;

/// Scope for a request: explicit body parameters win, otherwise the
/// persisted context selection applies.
pub(crate) async fn resolve_scope(
    state: &AppState,
    params: ScopeParams,
) -> Result<ContextScope, ApiError> {
    if params.is_empty() {
        Ok(state.projects.load_context().await?)
    } else {
        Ok(params.into_scope())
    }
}

pub(crate) fn jira_client(state: &AppState) -> Result<&Arc<JiraClient>, ApiError> {
    state.jira.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable(
            "Jira is not configured; set JIRA_BASE_URL, JIRA_EMAIL, and JIRA_API_TOKEN".to_owned(),
        )
    })
}
