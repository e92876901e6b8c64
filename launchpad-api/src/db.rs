use launchpad_core::domain::category::DEFAULT_CATEGORIES;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tasks table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title VARCHAR(200) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            completed BOOLEAN NOT NULL DEFAULT 0,
            priority VARCHAR(20) NOT NULL DEFAULT 'medium',
            category VARCHAR(50) NOT NULL DEFAULT 'general',
            due_date TIMESTAMP,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create categories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(50) NOT NULL UNIQUE,
            color VARCHAR(7) NOT NULL DEFAULT '#3B82F6',
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_category ON tasks(category)")
        .execute(pool)
        .await?;

    seed_categories(pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Inserts the default categories into an empty categories table
async fn seed_categories(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now();
    for (name, color) in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO categories (name, color, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(color)
            .bind(now)
            .execute(pool)
            .await?;
    }

    tracing::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
    Ok(())
}
