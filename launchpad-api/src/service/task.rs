//! Task Service
//!
//! Business logic for task management.

use chrono::Utc;
use launchpad_core::domain::task::{DEFAULT_CATEGORY, Priority, Task, parse_due_date};
use launchpad_core::dto::StatsResponse;
use launchpad_core::dto::task::{CreateTask, TaskFilter, UpdateTask};
use sqlx::SqlitePool;

use crate::repository::task::{NewTask, TaskQuery};
use crate::repository::task_repository;

const MAX_TITLE_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 50;

/// Service error type
#[derive(Debug)]
pub enum TaskError {
    NotFound(i64),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for TaskError {
    fn from(err: sqlx::Error) -> Self {
        TaskError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

/// Create a new task
pub async fn create_task(pool: &SqlitePool, req: CreateTask) -> Result<Task> {
    let title = validate_title(req.title.as_deref().unwrap_or_default())?;

    let priority = match req.priority.as_deref() {
        Some(priority) => parse_priority(priority)?,
        None => Priority::default(),
    };

    let category = match req.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => validate_category(category)?,
        _ => DEFAULT_CATEGORY.to_string(),
    };

    let due_date = match req.due_date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(parse_date(raw)?),
        _ => None,
    };

    let task = task_repository::create(
        pool,
        NewTask {
            title,
            description: req.description.unwrap_or_default(),
            priority,
            category,
            due_date,
        },
    )
    .await?;

    tracing::info!("Task created: {} ({})", task.title, task.id);

    Ok(task)
}

/// Get a task by ID
pub async fn get_task(pool: &SqlitePool, id: i64) -> Result<Task> {
    let task = task_repository::find_by_id(pool, id)
        .await?
        .ok_or(TaskError::NotFound(id))?;

    Ok(task)
}

/// List tasks matching the filter, newest first
///
/// Empty filter values are ignored.
pub async fn list_tasks(pool: &SqlitePool, filter: &TaskFilter) -> Result<Vec<Task>> {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    let query = TaskQuery {
        category: non_empty(&filter.category),
        priority: non_empty(&filter.priority),
        completed: filter.completed_flag(),
        search: non_empty(&filter.search),
    };

    let tasks = task_repository::list(pool, &query).await?;
    Ok(tasks)
}

/// Apply a partial update to a task
pub async fn update_task(pool: &SqlitePool, id: i64, req: UpdateTask) -> Result<Task> {
    let mut task = get_task(pool, id).await?;

    if let Some(title) = req.title.as_deref() {
        task.title = validate_title(title)?;
    }
    if let Some(description) = req.description {
        task.description = description.unwrap_or_default();
    }
    if let Some(completed) = req.completed {
        task.completed = completed;
    }
    if let Some(priority) = req.priority.as_deref() {
        task.priority = parse_priority(priority)?;
    }
    if let Some(category) = req.category.as_deref() {
        task.category = validate_category(category.trim())?;
    }
    match req.due_date {
        None => {}
        Some(None) => task.due_date = None,
        Some(Some(raw)) if raw.trim().is_empty() => task.due_date = None,
        Some(Some(raw)) => task.due_date = Some(parse_date(&raw)?),
    }

    task.updated_at = Utc::now();

    let updated = task_repository::update(pool, &task).await?;
    if !updated {
        return Err(TaskError::NotFound(id));
    }

    tracing::info!("Task updated: {} ({})", task.title, task.id);

    Ok(task)
}

/// Delete a task
pub async fn delete_task(pool: &SqlitePool, id: i64) -> Result<()> {
    let deleted = task_repository::delete(pool, id).await?;

    if !deleted {
        return Err(TaskError::NotFound(id));
    }

    tracing::info!("Task deleted: {}", id);

    Ok(())
}

/// Task statistics
pub async fn stats(pool: &SqlitePool) -> Result<StatsResponse> {
    let (total, completed) = task_repository::counts(pool).await?;
    Ok(StatsResponse::from_counts(total, completed))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(TaskError::ValidationError("Title is required".to_string()));
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::ValidationError(format!(
            "Title is too long (max {} characters)",
            MAX_TITLE_LEN
        )));
    }

    Ok(title.to_string())
}

fn validate_category(category: &str) -> Result<String> {
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(TaskError::ValidationError(format!(
            "Category is too long (max {} characters)",
            MAX_CATEGORY_LEN
        )));
    }

    Ok(category.to_string())
}

fn parse_priority(priority: &str) -> Result<Priority> {
    priority
        .trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(TaskError::ValidationError)
}

fn parse_date(raw: &str) -> Result<chrono::DateTime<Utc>> {
    parse_due_date(raw).ok_or_else(|| TaskError::ValidationError("Invalid date format".to_string()))
}
