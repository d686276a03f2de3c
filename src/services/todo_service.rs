use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::models::todo::{BulkUpdate, Todo, TodoStatus, TodoUpdate};
use crate::database::models::ValidationError;
use crate::database::repository::Repository;
use crate::database::versioned::VersionedModel;
use crate::filter::FilterData;

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Todo not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Reads and writes one person's to-do records through an injected repository.
///
/// The service does not check ownership: callers that act on behalf of a
/// person must compare `Todo::person_id` themselves.
pub struct TodoService {
    repository: Arc<dyn Repository<Todo>>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn Repository<Todo>>) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, entity_id: &str) -> Result<Option<Todo>, TodoError> {
        let filter = FilterData {
            where_clause: Some(json!({ "entity_id": entity_id })),
            ..Default::default()
        };
        Ok(self.repository.get_one(filter).await?)
    }

    async fn get_existing(&self, entity_id: &str) -> Result<Todo, TodoError> {
        self.get_by_id(entity_id)
            .await?
            .ok_or_else(|| TodoError::NotFound(entity_id.to_string()))
    }

    pub async fn create(&self, person_id: &str, title: &str) -> Result<Todo, TodoError> {
        let mut todo = Todo::new(person_id, title);
        todo.validate()?;
        todo.prepare_for_save(person_id);

        let saved = self.repository.save(todo).await?;
        info!("Created todo {} for person {}", saved.entity_id(), person_id);
        Ok(saved)
    }

    pub async fn update(
        &self,
        entity_id: &str,
        updates: &TodoUpdate,
        changed_by_id: &str,
    ) -> Result<Todo, TodoError> {
        let mut todo = self.get_existing(entity_id).await?;
        updates.apply(&mut todo);
        todo.validate()?;
        todo.prepare_for_save(changed_by_id);

        let saved = self.repository.save(todo).await?;
        debug!("Updated todo {} ({:?}) by {}", entity_id, updates, changed_by_id);
        Ok(saved)
    }

    /// Soft delete: the record stays stored with `active = false`
    pub async fn delete(&self, entity_id: &str, changed_by_id: &str) -> Result<Todo, TodoError> {
        let mut todo = self.get_existing(entity_id).await?;
        todo.active = false;
        todo.prepare_for_save(changed_by_id);

        let saved = self.repository.save(todo).await?;
        info!("Deleted todo {} by {}", entity_id, changed_by_id);
        Ok(saved)
    }

    /// Active records for `person_id`, oldest change first
    pub async fn list(&self, person_id: &str, status: TodoStatus) -> Result<Vec<Todo>, TodoError> {
        let mut where_clause = json!({ "person_id": person_id, "active": true });
        if let Some(is_completed) = status.completion() {
            where_clause["is_completed"] = json!(is_completed);
        }

        let filter = FilterData {
            where_clause: Some(where_clause),
            order: Some(json!("changed_on asc")),
            ..Default::default()
        };
        Ok(self.repository.get_many(filter).await?)
    }

    /// Apply `changes` to every active record of `person_id`.
    ///
    /// Records are saved one at a time. A failed save stops the loop and is
    /// returned; records saved before it keep their new state.
    pub async fn update_status_bulk(
        &self,
        person_id: &str,
        changes: BulkUpdate,
    ) -> Result<Vec<Todo>, TodoError> {
        let todos = self.list(person_id, TodoStatus::All).await?;
        let mut updated = Vec::with_capacity(todos.len());

        for mut todo in todos {
            changes.apply(&mut todo);
            todo.prepare_for_save(person_id);
            updated.push(self.repository.save(todo).await?);
        }

        info!("Bulk updated {} todos for person {} ({:?})", updated.len(), person_id, changes);
        Ok(updated)
    }

    /// Every saved version of `entity_id`, oldest first
    pub async fn history(&self, entity_id: &str) -> Result<Vec<Todo>, TodoError> {
        Ok(self.repository.history(entity_id).await?)
    }

    pub async fn health_check(&self) -> Result<(), TodoError> {
        Ok(self.repository.health_check().await?)
    }
}
