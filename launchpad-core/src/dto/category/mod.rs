//! Category DTOs

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// Request to create a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// GET /api/categories response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<Category>,
}

/// POST /api/categories response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: Category,
}
