mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn create_returns_defaults() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.request(Method::POST, "/todo/", Some(json!({ "title": "Buy milk" }))).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);

    let todo = &res.data()["todo"];
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["person_id"], app.person_id.as_str());
    assert_eq!(todo["active"], true);
    assert_eq!(todo["is_completed"], false);
    assert_eq!(todo["changed_by_id"], app.person_id.as_str());
    Ok(())
}

#[tokio::test]
async fn create_requires_title() -> Result<()> {
    let app = TestApp::spawn().await?;

    for body in [json!({}), json!({ "title": "   " })] {
        let res = app.request(Method::POST, "/todo/", Some(body)).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["message"], "title is required");
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
    assert!(app.list_todos("all").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let res = app.request(Method::POST, "/todo/", Some(json!("title"))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn status_filters_split_pending_and_completed() -> Result<()> {
    let app = TestApp::spawn().await?;
    let milk = app.create_todo("Buy milk").await?;
    app.create_todo("Walk dog").await?;

    let res = app
        .request(Method::PATCH, &format!("/todo/{}", milk), Some(json!({ "is_completed": true })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["todo"]["is_completed"], true);

    assert_eq!(app.list_todos("all").await?.len(), 2);
    for status in ["completed", "active"] {
        let todos = app.list_todos(status).await?;
        assert_eq!(todos.len(), 1, "status {}", status);
        assert_eq!(todos[0]["entity_id"], milk.as_str());
    }
    for status in ["pending", "inactive"] {
        let todos = app.list_todos(status).await?;
        assert_eq!(todos.len(), 1, "status {}", status);
        assert_eq!(todos[0]["title"], "Walk dog");
    }
    Ok(())
}

#[tokio::test]
async fn list_defaults_to_all_and_rejects_unknown_status() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.create_todo("Buy milk").await?;

    let res = app.request(Method::GET, "/todo/", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["todos"].as_array().map(Vec::len), Some(1));

    let res = app.request(Method::GET, "/todo/?status=archived", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn soft_deleted_record_leaves_every_listing() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create_todo("Buy milk").await?;

    app.request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "is_completed": true })))
        .await?;
    let res = app
        .request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "is_deleted": true })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["todo"]["active"], false);

    for status in ["all", "pending", "completed", "active", "inactive"] {
        assert!(app.list_todos(status).await?.is_empty(), "status {}", status);
    }
    Ok(())
}

#[tokio::test]
async fn delete_route_soft_deletes() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create_todo("Buy milk").await?;

    let res = app.request(Method::DELETE, &format!("/todo/{}", id), None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["todo"]["active"], false);
    assert!(app.list_todos("all").await?.is_empty());

    // the record is still stored
    let stored = app.state.todos.get_by_id(&id).await?.expect("record kept");
    assert!(!stored.active);
    Ok(())
}

#[tokio::test]
async fn deleted_record_cannot_be_patched_or_deleted_again() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create_todo("Buy milk").await?;
    app.request(Method::DELETE, &format!("/todo/{}", id), None).await?;
    let version = app.state.todos.get_by_id(&id).await?.expect("record kept").versioning.version;

    let res = app.request(Method::DELETE, &format!("/todo/{}", id), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Details Not Found");

    let res = app
        .request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "is_completed": true })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Details Not Found");

    let stored = app.state.todos.get_by_id(&id).await?.expect("record kept");
    assert_eq!(stored.versioning.version, version);
    assert!(!stored.is_completed);
    Ok(())
}

#[tokio::test]
async fn patch_ignores_blank_title_and_rejects_unknown_keys() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create_todo("Buy milk").await?;

    let res = app
        .request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "title": "" })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["todo"]["title"], "Buy milk");

    let res = app
        .request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "title": "Buy oat milk" })))
        .await?;
    assert_eq!(res.data()["todo"]["title"], "Buy oat milk");

    let res = app
        .request(Method::PATCH, &format!("/todo/{}", id), Some(json!({ "person_id": "someone-else" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_or_foreign_records_read_as_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;
    let id = app.create_todo("Buy milk").await?;
    let other = app.other_person_token().await?;

    let res = app
        .request(Method::PATCH, "/todo/does-not-exist", Some(json!({ "is_completed": true })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Details Not Found");

    let res = app
        .request_as(&other, Method::PATCH, &format!("/todo/{}", id), Some(json!({ "is_completed": true })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Details Not Found");

    let res = app.request_as(&other, Method::DELETE, &format!("/todo/{}", id), None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // owner's record is untouched and invisible to the other person
    let todos = app.list_todos("pending").await?;
    assert_eq!(todos.len(), 1);
    let res = app.request_as(&other, Method::GET, "/todo/", None).await?;
    assert_eq!(res.data()["todos"].as_array().map(Vec::len), Some(0));
    Ok(())
}
