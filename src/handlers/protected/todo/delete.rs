use axum::extract::{Path, State};
use axum::Extension;

use super::{owned_todo, TodoBody};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

/// DELETE /todo/:entity_id - soft delete
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthPerson>,
    Path(entity_id): Path<String>,
) -> ApiResult<TodoBody> {
    owned_todo(&state.todos, &entity_id, auth.person_id()).await?;
    let todo = state.todos.delete(&entity_id, auth.person_id()).await?;
    Ok(ApiResponse::success(TodoBody { todo }))
}
