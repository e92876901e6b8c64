//! Service Module
//!
//! Business logic layer for the task API.
//! Services validate requests and orchestrate repository calls.

pub mod category;
pub mod task;

// Re-export for convenience
pub use category as category_service;
pub use task as task_service;
