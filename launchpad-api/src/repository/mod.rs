//! Repository Module
//!
//! Data access layer for the task API.
//! Each repository handles database operations for a specific domain entity.

pub mod category;
pub mod task;

// Re-export for convenience
pub use category as category_repository;
pub use task as task_repository;
