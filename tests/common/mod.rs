#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use todo_api::{app, auth, AppState};

/// Router over fresh in-memory storage plus one seeded person
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub person_id: String,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let state = AppState::in_memory();
        let person = state.people.create("Ada", "Lovelace").await?;
        let person_id = person.versioning.entity_id.clone();
        let token = auth::issue_token(&person_id)?;

        Ok(Self {
            router: app(state.clone()),
            state,
            person_id,
            token,
        })
    }

    /// A second person sharing the same storage
    pub async fn other_person_token(&self) -> Result<String> {
        let other = self.state.people.create("Grace", "Hopper").await?;
        Ok(auth::issue_token(&other.versioning.entity_id)?)
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
        self.request_as(&self.token, method, uri, body).await
    }

    pub async fn request_as(&self, token: &str, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !token.is_empty() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await.context("router call failed")?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };

        Ok(TestResponse { status, body })
    }

    /// POST /todo/ and return the created record's entity_id
    pub async fn create_todo(&self, title: &str) -> Result<String> {
        let res = self
            .request(Method::POST, "/todo/", Some(serde_json::json!({ "title": title })))
            .await?;
        assert_eq!(res.status, StatusCode::OK, "create failed: {}", res.body);
        res.data()["todo"]["entity_id"]
            .as_str()
            .map(str::to_string)
            .context("created todo has no entity_id")
    }

    pub async fn list_todos(&self, status: &str) -> Result<Vec<Value>> {
        let res = self.request(Method::GET, &format!("/todo/?status={}", status), None).await?;
        assert_eq!(res.status, StatusCode::OK, "list failed: {}", res.body);
        res.data()["todos"].as_array().cloned().context("todos is not an array")
    }
}
