// handlers/protected/person.rs - Profile of the authenticated person

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::Value;

use super::utils::parse_body;
use crate::app::AppState;
use crate::database::models::person::{Person, PersonUpdate};
use crate::middleware::{ApiResponse, ApiResult, AuthPerson};

#[derive(Debug, Serialize)]
pub struct PersonBody {
    pub person: Person,
}

/// GET /person/me
pub async fn person_me(Extension(auth): Extension<AuthPerson>) -> ApiResult<PersonBody> {
    Ok(ApiResponse::success(PersonBody { person: auth.person }))
}

/// PATCH /person/me - change first and last name
pub async fn person_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthPerson>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PersonBody> {
    let update: PersonUpdate = parse_body(body)?;
    let person = state.people.update_profile(auth.person, &update).await?;
    Ok(ApiResponse::success(PersonBody { person }))
}
