//! Project and document management plus the persisted context selection.

use std::sync::Arc;

use uuid::Uuid;

use cardy_core::{ContextScope, Document, Project, ProjectInput};
use cardy_storage::StorageError;
use cardy_storage::traits::Storage;

use crate::ServiceError;

pub struct ProjectService {
    storage: Arc<dyn Storage>,
}

impl ProjectService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("project name must not be empty".into()));
        }
        Ok(self.storage.create_project(input).await?)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, ServiceError> {
        self.storage
            .get_project(id)
            .await?
            .ok_or(ServiceError::Storage(StorageError::NotFound {
                entity: "project",
                id: id.to_string(),
            }))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.storage.list_projects().await?)
    }

    /// Delete a project; its documents and chunks cascade.
    pub async fn delete_project(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.storage.delete_project(id).await? {
            Ok(())
        } else {
            Err(ServiceError::Storage(StorageError::NotFound {
                entity: "project",
                id: id.to_string(),
            }))
        }
    }

    pub async fn list_documents(&self, project_id: Uuid) -> Result<Vec<Document>, ServiceError> {
        Ok(self.storage.list_documents(project_id).await?)
    }

    pub async fn get_document(&self, id: Uuid) -> Result<Document, ServiceError> {
        self.storage
            .get_document(id)
            .await?
            .ok_or(ServiceError::Storage(StorageError::NotFound {
                entity: "document",
                id: id.to_string(),
            }))
    }

    pub async fn delete_document(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.storage.delete_document(id).await? {
            Ok(())
        } else {
            Err(ServiceError::Storage(StorageError::NotFound {
                entity: "document",
                id: id.to_string(),
            }))
        }
    }

    /// Replace the persisted context selection wholesale.
    pub async fn save_context(&self, scope: &ContextScope) -> Result<(), ServiceError> {
        Ok(self.storage.save_context_selection(scope).await?)
    }

    /// Load the persisted context selection; unscoped when never saved.
    pub async fn load_context(&self) -> Result<ContextScope, ServiceError> {
        Ok(self.storage.load_context_selection().await?.unwrap_or_default())
    }
}
