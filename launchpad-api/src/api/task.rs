//! Task API Handlers
//!
//! HTTP endpoints for task CRUD.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use launchpad_core::dto::MessageResponse;
use launchpad_core::dto::task::{CreateTask, TaskFilter, TaskListResponse, TaskResponse, UpdateTask};
use sqlx::SqlitePool;

use crate::api::error::ApiResult;
use crate::service::task_service;

/// GET /api/tasks
/// List tasks, optionally filtered by category, priority, completion or search text
pub async fn list_tasks(
    State(pool): State<SqlitePool>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<TaskListResponse>> {
    tracing::debug!("Listing tasks: {:?}", filter);

    let tasks = task_service::list_tasks(&pool, &filter).await?;

    Ok(Json(tasks.into()))
}

/// GET /api/tasks/{id}
/// Get a task by ID
pub async fn get_task(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Path(id) = id?;
    tracing::debug!("Getting task: {}", id);

    let task = task_service::get_task(&pool, id).await?;

    Ok(Json(TaskResponse {
        success: true,
        message: None,
        task,
    }))
}

/// POST /api/tasks
/// Create a new task
pub async fn create_task(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let Json(req) = payload?;

    let task = task_service::create_task(&pool, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            message: Some("Task created successfully".to_string()),
            task,
        }),
    ))
}

/// PUT /api/tasks/{id}
/// Partially update a task
pub async fn update_task(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let Path(id) = id?;
    let Json(req) = payload?;

    let task = task_service::update_task(&pool, id, req).await?;

    Ok(Json(TaskResponse {
        success: true,
        message: Some("Task updated successfully".to_string()),
        task,
    }))
}

/// DELETE /api/tasks/{id}
/// Delete a task
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    task_service::delete_task(&pool, id).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
    }))
}
