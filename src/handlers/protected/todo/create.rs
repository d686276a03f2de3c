use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::TodoBody;
use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_body;
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodo {
    pub title: Option<String>,
}

/// POST /todo/ - create a record owned by the caller
pub async fn todo_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthPerson>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TodoBody> {
    let payload: CreateTodo = parse_body(body)?;

    let title = match payload.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => {
            let mut fields = HashMap::new();
            fields.insert("title".to_string(), "title is required.".to_string());
            return Err(ApiError::validation_error("title is required", Some(fields)));
        }
    };

    let todo = state.todos.create(auth.person_id(), &title).await?;
    Ok(ApiResponse::success(TodoBody { todo }))
}
