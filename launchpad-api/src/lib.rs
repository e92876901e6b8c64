//! Task Manager API
//!
//! REST API over a SQLite database: tasks with priorities, categories and
//! due dates, plus health and statistics endpoints used by deployment
//! verification.

pub mod api;
pub mod db;
pub mod repository;
pub mod service;

pub use api::create_router;
