//! Category Service
//!
//! Business logic for category management.

use launchpad_core::domain::category::{Category, DEFAULT_COLOR};
use launchpad_core::dto::category::CreateCategory;
use sqlx::SqlitePool;

use crate::repository::category_repository;

const MAX_NAME_LEN: usize = 50;

/// Service error type
#[derive(Debug)]
pub enum CategoryError {
    AlreadyExists(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for CategoryError {
    fn from(err: sqlx::Error) -> Self {
        CategoryError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, CategoryError>;

/// List all categories
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
    let categories = category_repository::list_all(pool).await?;
    Ok(categories)
}

/// Create a new category
pub async fn create_category(pool: &SqlitePool, req: CreateCategory) -> Result<Category> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    validate_name(name)?;

    let color = match req.color.as_deref().map(str::trim) {
        Some(color) if !color.is_empty() => validate_color(color)?,
        _ => DEFAULT_COLOR,
    };

    if category_repository::find_by_name(pool, name).await?.is_some() {
        return Err(CategoryError::AlreadyExists(name.to_string()));
    }

    let category = category_repository::create(pool, name, color)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent insert of the same name
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                CategoryError::AlreadyExists(name.to_string())
            } else {
                CategoryError::DatabaseError(e)
            }
        })?;

    tracing::info!("Category created: {} ({})", category.name, category.id);

    Ok(category)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CategoryError::ValidationError("Name is required".to_string()));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryError::ValidationError(format!(
            "Name is too long (max {} characters)",
            MAX_NAME_LEN
        )));
    }

    Ok(())
}

/// Colours are `#RRGGBB`
fn validate_color(color: &str) -> Result<&str> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if valid {
        Ok(color)
    } else {
        Err(CategoryError::ValidationError(format!(
            "Invalid color '{}': expected #RRGGBB",
            color
        )))
    }
}
