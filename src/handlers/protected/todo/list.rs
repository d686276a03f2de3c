use axum::extract::{Query, State};
use axum::Extension;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::todo::{Todo, TodoStatus};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// GET /todo/ - active records of the caller, oldest change first
pub async fn todo_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthPerson>,
    Query(query): Query<ListQuery>,
) -> ApiResult<TodoList> {
    let status = match query.status.as_deref() {
        Some(raw) => raw.parse::<TodoStatus>().map_err(ApiError::bad_request)?,
        None => TodoStatus::All,
    };

    let todos = state.todos.list(auth.person_id(), status).await?;
    tracing::debug!("Listed {} todos ({:?}) for {}", todos.len(), status, auth.person_id());
    Ok(ApiResponse::success(TodoList { todos }))
}
