//! Task Repository
//!
//! Handles all database operations related to tasks.

use chrono::{DateTime, Utc};
use launchpad_core::domain::task::{Priority, Task};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const TASK_COLUMNS: &str =
    "id, title, description, completed, priority, category, due_date, created_at, updated_at";

/// Validated values for a new task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
}

/// Listing filters; `None` means "any"
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    /// Substring of the title or description
    pub search: Option<String>,
}

/// Create a new task in the database
pub async fn create(pool: &SqlitePool, new: NewTask) -> Result<Task, sqlx::Error> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (
            title, description, completed, priority, category,
            due_date, created_at, updated_at
        )
        VALUES (?, ?, 0, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.priority.as_str())
    .bind(&new.category)
    .bind(new.due_date)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Task {
        id: result.last_insert_rowid(),
        title: new.title,
        description: new.description,
        completed: false,
        priority: new.priority,
        category: new.category,
        due_date: new.due_date,
        created_at: now,
        updated_at: now,
    })
}

/// Find a task by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    let row = sqlx::query_as::<_, TaskRow>(&format!(
        "SELECT {} FROM tasks WHERE id = ?",
        TASK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List tasks matching the query, newest first
pub async fn list(pool: &SqlitePool, query: &TaskQuery) -> Result<Vec<Task>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM tasks WHERE 1 = 1", TASK_COLUMNS));

    if let Some(category) = &query.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(priority) = &query.priority {
        builder.push(" AND priority = ").push_bind(priority.clone());
    }
    if let Some(completed) = query.completed {
        builder.push(" AND completed = ").push_bind(completed);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    builder.push(" ORDER BY created_at DESC, id DESC");

    let rows = builder.build_query_as::<TaskRow>().fetch_all(pool).await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Persist every mutable field of a task
pub async fn update(pool: &SqlitePool, task: &Task) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE tasks
        SET title = ?, description = ?, completed = ?, priority = ?,
            category = ?, due_date = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.completed)
    .bind(task.priority.as_str())
    .bind(&task.category)
    .bind(task.due_date)
    .bind(task.updated_at)
    .bind(task.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a task
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Total and completed task counts
pub async fn counts(pool: &SqlitePool) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN completed THEN 1 ELSE 0 END), 0) FROM tasks",
    )
    .fetch_one(pool)
    .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    priority: String,
    category: String,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            // Only validated priorities are ever written
            priority: row.priority.parse().unwrap_or_default(),
            category: row.category,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
