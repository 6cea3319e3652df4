use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scope applied to retrieval and generation calls.
///
/// Passed explicitly into every query instead of living in shared mutable
/// state. An empty `document_ids` list means "all documents in the project";
/// a `None` project means no scoping at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextScope {
    /// Restrict results to this project
    pub project_id: Option<Uuid>,
    /// Further restrict to these documents (empty = no document filter)
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
}

impl ContextScope {
    /// Scope covering a whole project.
    pub fn project(project_id: Uuid) -> Self {
        Self { project_id: Some(project_id), document_ids: Vec::new() }
    }

    /// Scope covering selected documents of a project.
    pub fn documents(project_id: Uuid, document_ids: Vec<Uuid>) -> Self {
        Self { project_id: Some(project_id), document_ids }
    }

    /// Whether this scope filters anything at all.
    pub fn is_unscoped(&self) -> bool {
        self.project_id.is_none() && self.document_ids.is_empty()
    }
}
