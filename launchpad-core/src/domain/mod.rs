//! Core domain types
//!
//! These types describe the entities the pipeline creates and consumes
//! (deployment target, inventory, evidence) and the entities owned by the
//! deployed task API (tasks, categories). They carry structure only:
//! process invocation lives in the runner, persistence in the API.

pub mod category;
pub mod evidence;
pub mod inventory;
pub mod target;
pub mod task;
pub mod variables;
