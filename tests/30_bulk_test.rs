mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

use common::TestApp;

async fn seeded(count: usize) -> Result<TestApp> {
    let app = TestApp::spawn().await?;
    for i in 0..count {
        app.create_todo(&format!("Task {}", i)).await?;
    }
    Ok(app)
}

#[tokio::test]
async fn bulk_activate_completes_everything() -> Result<()> {
    let app = seeded(3).await?;

    let res = app.request(Method::POST, "/todo/bulk/activate", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["updated"], 3);

    assert_eq!(app.list_todos("completed").await?.len(), 3);
    assert!(app.list_todos("pending").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn bulk_deactivate_reopens_everything() -> Result<()> {
    let app = seeded(3).await?;
    app.request(Method::POST, "/todo/bulk/activate", None).await?;

    let res = app.request(Method::POST, "/todo/bulk/deactivate", None).await?;
    assert_eq!(res.data()["updated"], 3);

    assert!(app.list_todos("active").await?.is_empty());
    assert_eq!(app.list_todos("inactive").await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn bulk_delete_empties_every_listing() -> Result<()> {
    let app = seeded(3).await?;

    let res = app.request(Method::POST, "/todo/bulk/delete", None).await?;
    assert_eq!(res.data()["updated"], 3);

    for status in ["all", "pending", "completed"] {
        assert!(app.list_todos(status).await?.is_empty(), "status {}", status);
    }

    // nothing left to update
    let res = app.request(Method::POST, "/todo/bulk/delete", None).await?;
    assert_eq!(res.data()["updated"], 0);
    Ok(())
}

#[tokio::test]
async fn bulk_updates_only_touch_the_callers_records() -> Result<()> {
    let app = seeded(2).await?;
    let other = app.other_person_token().await?;
    app.request_as(&other, Method::POST, "/todo/", Some(serde_json::json!({ "title": "Theirs" })))
        .await?;

    let res = app.request(Method::POST, "/todo/bulk/delete", None).await?;
    assert_eq!(res.data()["updated"], 2);

    let res = app.request_as(&other, Method::GET, "/todo/", None).await?;
    assert_eq!(res.data()["todos"].as_array().map(Vec::len), Some(1));
    Ok(())
}
