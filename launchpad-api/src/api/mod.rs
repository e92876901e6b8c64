//! API Module
//!
//! HTTP API layer for the task manager.
//! Each submodule handles endpoints for a specific domain.

pub mod category;
pub mod error;
pub mod health;
pub mod task;

use axum::{
    Router,
    routing::get,
};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the main API router with all endpoints
pub fn create_router(pool: SqlitePool) -> Router {
    Router::new()
        // Service information and health
        .route("/", get(health::index))
        .route("/api/health", get(health::health_check))
        .route("/api/stats", get(health::stats))
        // Task endpoints
        .route("/api/tasks", get(task::list_tasks).post(task::create_task))
        .route(
            "/api/tasks/{id}",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        // Category endpoints
        .route(
            "/api/categories",
            get(category::list_categories).post(category::create_category),
        )
        .fallback(error::not_found)
        // Add state and middleware
        .with_state(pool)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
