//! Category Repository
//!
//! Handles all database operations related to categories.

use launchpad_core::domain::category::Category;
use sqlx::SqlitePool;

/// Create a new category in the database
///
/// Names are unique; a duplicate surfaces as a unique-violation database error.
pub async fn create(pool: &SqlitePool, name: &str, color: &str) -> Result<Category, sqlx::Error> {
    let now = chrono::Utc::now();

    let result = sqlx::query("INSERT INTO categories (name, color, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(color)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(Category {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        color: color.to_string(),
        created_at: now,
    })
}

/// Find a category by exact name
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Category>, sqlx::Error> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, color, created_at FROM categories WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all categories in creation order
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, color, created_at FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    color: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            color: row.color,
            created_at: row.created_at,
        }
    }
}
