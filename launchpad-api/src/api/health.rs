//! Health and Statistics API Handlers
//!
//! Service information, liveness with a database round trip, and task
//! statistics.

use axum::{Json, extract::State, http::StatusCode};
use launchpad_core::dto::{HealthResponse, StatsResponse};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::api::error::ApiResult;
use crate::service::task_service;

/// GET /
/// API information
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Task Manager API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "tasks": "/api/tasks",
            "categories": "/api/categories",
            "health": "/api/health",
            "stats": "/api/stats"
        }
    }))
}

/// GET /api/health
/// Health check; answers 503 when the database does not respond
pub async fn health_check(State(pool): State<SqlitePool>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&pool)
        .await
        .inspect_err(|e| tracing::error!("Health check query failed: {}", e))
        .is_ok();

    let (status, health, database) = if database_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    let body = HealthResponse {
        status: health.to_string(),
        timestamp: chrono::Utc::now(),
        database: database.to_string(),
    };

    (status, Json(body))
}

/// GET /api/stats
/// Task statistics
pub async fn stats(State(pool): State<SqlitePool>) -> ApiResult<Json<StatsResponse>> {
    let stats = task_service::stats(&pool).await?;
    Ok(Json(stats))
}
