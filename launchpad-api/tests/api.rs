use axum::http::StatusCode;
use http_body_util::BodyExt;
use launchpad_api::{create_router, db};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// In-memory database with migrations applied; one connection so every
/// query sees the same database.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn test_app() -> axum::Router {
    create_router(test_pool().await)
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn put_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

async fn delete(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Create a task and return its id.
async fn create(app: &axum::Router, body: Value) -> i64 {
    let (status, json) = post_json(app, "/api/tasks", body).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["task"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Service information
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_describes_the_api() {
    let app = test_app().await;
    let (status, json) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Task Manager API");
    assert_eq!(json["status"], "running");
    assert_eq!(json["endpoints"]["health"], "/api/health");
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn health_is_unavailable_without_database() {
    let pool = test_pool().await;
    let app = create_router(pool.clone());
    pool.close().await;

    let (status, json) = get(&app, "/api/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/nothing-here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Resource not found");
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_task_applies_defaults() {
    let app = test_app().await;
    let (status, json) = post_json(
        &app,
        "/api/tasks",
        json!({ "title": "Buy milk", "priority": "high" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Task created successfully");
    assert_eq!(json["task"]["title"], "Buy milk");
    assert_eq!(json["task"]["priority"], "high");
    assert_eq!(json["task"]["completed"], false);
    assert_eq!(json["task"]["category"], "general");
    assert_eq!(json["task"]["description"], "");
    assert!(json["task"]["due_date"].is_null());
}

#[tokio::test]
async fn create_task_requires_title() {
    let app = test_app().await;

    let (status, json) = post_json(&app, "/api/tasks", json!({ "priority": "low" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Title is required");

    let (status, _) = post_json(&app, "/api/tasks", json!({ "title": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_task_rejects_bad_priority_and_date() {
    let app = test_app().await;

    let (status, json) = post_json(
        &app,
        "/api/tasks",
        json!({ "title": "Ship it", "priority": "urgent" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("urgent"));

    let (status, json) = post_json(
        &app,
        "/api/tasks",
        json!({ "title": "Ship it", "due_date": "next friday" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid date format");
}

#[tokio::test]
async fn create_task_rejects_malformed_json() {
    let app = test_app().await;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/tasks")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn get_task_by_id() {
    let app = test_app().await;
    let id = create(&app, json!({ "title": "Read book", "due_date": "2025-03-01" })).await;

    let (status, json) = get(&app, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["title"], "Read book");
    assert!(json["task"]["due_date"].as_str().unwrap().starts_with("2025-03-01T00:00:00"));
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let app = test_app().await;

    let (status, json) = get(&app, "/api/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, _) = get(&app, "/api/tasks/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put_json(&app, "/api/tasks/999", json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, "/api/tasks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_tasks_newest_first_with_filters() {
    let app = test_app().await;
    let first = create(
        &app,
        json!({ "title": "Write report", "category": "Work", "priority": "high" }),
    )
    .await;
    let second = create(
        &app,
        json!({ "title": "Buy apples", "description": "green ones", "category": "Shopping" }),
    )
    .await;
    let third = create(&app, json!({ "title": "Call plumber", "category": "Work" })).await;
    put_json(&app, &format!("/api/tasks/{third}"), json!({ "completed": true })).await;

    let (status, json) = get(&app, "/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    let ids: Vec<i64> = json["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);

    let (_, json) = get(&app, "/api/tasks?category=Work").await;
    assert_eq!(json["count"], 2);

    let (_, json) = get(&app, "/api/tasks?category=Work&completed=false").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["tasks"][0]["id"], first);

    let (_, json) = get(&app, "/api/tasks?priority=high").await;
    assert_eq!(json["count"], 1);

    let (_, json) = get(&app, "/api/tasks?search=green").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["tasks"][0]["id"], second);

    let (_, json) = get(&app, "/api/tasks?search=plumb").await;
    assert_eq!(json["tasks"][0]["id"], third);
}

#[tokio::test]
async fn update_task_is_partial() {
    let app = test_app().await;
    let id = create(
        &app,
        json!({ "title": "Renew passport", "description": "before June", "due_date": "2025-05-01T09:00:00Z" }),
    )
    .await;

    let (status, json) = put_json(
        &app,
        &format!("/api/tasks/{id}"),
        json!({ "completed": true, "priority": "low" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Task updated successfully");
    assert_eq!(json["task"]["completed"], true);
    assert_eq!(json["task"]["priority"], "low");
    assert_eq!(json["task"]["title"], "Renew passport");
    assert_eq!(json["task"]["description"], "before June");
    assert!(json["task"]["due_date"].is_string());

    let (status, json) = put_json(&app, &format!("/api/tasks/{id}"), json!({ "due_date": null })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["task"]["due_date"].is_null());
    assert_eq!(json["task"]["description"], "before June");

    let (status, json) = put_json(
        &app,
        &format!("/api/tasks/{id}"),
        json!({ "description": null }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["task"]["description"], "");
    assert_eq!(json["task"]["title"], "Renew passport");

    let (status, _) = put_json(&app, &format!("/api/tasks/{id}"), json!({ "priority": "asap" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&app, &format!("/api/tasks/{id}")).await;
    assert_eq!(json["task"]["completed"], true);
    assert_eq!(json["task"]["priority"], "low");
}

#[tokio::test]
async fn delete_task_removes_it() {
    let app = test_app().await;
    let id = create(&app, json!({ "title": "Temporary" })).await;

    let (status, json) = delete(&app, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Task deleted successfully");

    let (status, _) = get(&app, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_count_completion() {
    let app = test_app().await;

    let (_, json) = get(&app, "/api/stats").await;
    assert_eq!(json["total_tasks"], 0);
    assert_eq!(json["completion_rate"], 0.0);

    create(&app, json!({ "title": "One" })).await;
    create(&app, json!({ "title": "Two" })).await;
    let done = create(&app, json!({ "title": "Three" })).await;
    put_json(&app, &format!("/api/tasks/{done}"), json!({ "completed": true })).await;

    let (status, json) = get(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_tasks"], 3);
    assert_eq!(json["completed_tasks"], 1);
    assert_eq!(json["pending_tasks"], 2);
    assert_eq!(json["completion_rate"], 33.33);
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn default_categories_are_seeded() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Work", "Personal", "Shopping", "Health", "General"]);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let pool = test_pool().await;
    db::run_migrations(&pool).await.unwrap();

    let app = create_router(pool);
    let (_, json) = get(&app, "/api/categories").await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn create_category_and_reject_duplicates() {
    let app = test_app().await;

    let (status, json) = post_json(&app, "/api/categories", json!({ "name": "Errands" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["category"]["name"], "Errands");
    assert_eq!(json["category"]["color"], "#3B82F6");

    let (status, json) = post_json(
        &app,
        "/api/categories",
        json!({ "name": "Errands", "color": "#10B981" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);

    let (status, json) = post_json(&app, "/api/categories", json!({ "color": "#10B981" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Name is required");

    let (status, _) = post_json(
        &app,
        "/api/categories",
        json!({ "name": "Garden", "color": "green" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
