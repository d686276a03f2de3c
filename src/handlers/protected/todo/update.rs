use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;

use super::{owned_todo, TodoBody};
use crate::app::AppState;
use crate::database::models::todo::TodoUpdate;
use crate::handlers::protected::utils::parse_body;
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

/// Client-facing patch body. `is_deleted` is the inverse of the stored
/// `active` flag.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
    pub is_deleted: Option<bool>,
}

impl From<TodoPatch> for TodoUpdate {
    fn from(patch: TodoPatch) -> Self {
        TodoUpdate {
            // blank titles leave the stored one alone
            title: patch.title.filter(|t| !t.trim().is_empty()),
            is_completed: patch.is_completed,
            active: patch.is_deleted.map(|deleted| !deleted),
        }
    }
}

/// PATCH /todo/:entity_id
pub async fn todo_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthPerson>,
    Path(entity_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoBody> {
    let patch: TodoPatch = parse_body(body)?;
    owned_todo(&state.todos, &entity_id, auth.person_id()).await?;

    let todo = state
        .todos
        .update(&entity_id, &TodoUpdate::from(patch), auth.person_id())
        .await?;
    Ok(ApiResponse::success(TodoBody { todo }))
}
