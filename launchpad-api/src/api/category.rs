//! Category API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use launchpad_core::dto::category::{CategoryListResponse, CategoryResponse, CreateCategory};
use sqlx::SqlitePool;

use crate::api::error::ApiResult;
use crate::service::category_service;

/// GET /api/categories
pub async fn list_categories(
    State(pool): State<SqlitePool>,
) -> ApiResult<Json<CategoryListResponse>> {
    let categories = category_service::list_categories(&pool).await?;

    Ok(Json(CategoryListResponse {
        success: true,
        categories,
    }))
}

/// POST /api/categories
/// Create a category; names are unique
pub async fn create_category(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let Json(req) = payload?;

    let category = category_service::create_category(&pool, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            success: true,
            category,
        }),
    ))
}
