use axum::extract::State;
use axum::Extension;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::todo::BulkUpdate;
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

#[derive(Debug, Serialize)]
pub struct BulkResult {
    pub updated: usize,
}

async fn apply_bulk(state: &AppState, auth: &AuthPerson, changes: BulkUpdate) -> ApiResult<BulkResult> {
    let updated = state.todos.update_status_bulk(auth.person_id(), changes).await?;
    Ok(ApiResponse::success(BulkResult { updated: updated.len() }))
}

/// POST /todo/bulk/activate - mark every active record completed
pub async fn bulk_activate(State(state): State<AppState>, Extension(auth): Extension<AuthPerson>) -> ApiResult<BulkResult> {
    apply_bulk(&state, &auth, BulkUpdate::complete_all()).await
}

/// POST /todo/bulk/deactivate - mark every active record pending
pub async fn bulk_deactivate(State(state): State<AppState>, Extension(auth): Extension<AuthPerson>) -> ApiResult<BulkResult> {
    apply_bulk(&state, &auth, BulkUpdate::reopen_all()).await
}

/// POST /todo/bulk/delete
pub async fn bulk_delete(State(state): State<AppState>, Extension(auth): Extension<AuthPerson>) -> ApiResult<BulkResult> {
    apply_bulk(&state, &auth, BulkUpdate::delete_all()).await
}
