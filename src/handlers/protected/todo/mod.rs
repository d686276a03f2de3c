// handlers/protected/todo - Todo endpoints for the authenticated person
//
// Routes:
//   GET    /todo/                      list (?status=all|pending|completed)
//   POST   /todo/                      create
//   PATCH  /todo/:entity_id            patch flags and title
//   DELETE /todo/:entity_id            soft delete
//   POST   /todo/bulk/activate         mark all completed
//   POST   /todo/bulk/deactivate       mark all pending
//   POST   /todo/bulk/delete           soft delete all

pub mod bulk;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

pub use bulk::{bulk_activate, bulk_deactivate, bulk_delete};
pub use create::todo_create;
pub use delete::todo_delete;
pub use list::todo_list;
pub use update::todo_update;

use serde::Serialize;

use crate::database::models::todo::Todo;
use crate::error::{ApiError, TODO_NOT_FOUND};
use crate::services::TodoService;

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub todo: Todo,
}

/// Load `entity_id` if it is active and belongs to `person_id`. Foreign and
/// soft-deleted records are reported exactly like missing ones.
pub(crate) async fn owned_todo(todos: &TodoService, entity_id: &str, person_id: &str) -> Result<Todo, ApiError> {
    match todos.get_by_id(entity_id).await? {
        Some(todo) if todo.person_id == person_id && todo.active => Ok(todo),
        Some(todo) if todo.person_id == person_id => Err(ApiError::bad_request(TODO_NOT_FOUND)),
        Some(_) => {
            tracing::warn!("Person {} attempted to access todo {} owned by someone else", person_id, entity_id);
            Err(ApiError::bad_request(TODO_NOT_FOUND))
        }
        None => Err(ApiError::bad_request(TODO_NOT_FOUND)),
    }
}
