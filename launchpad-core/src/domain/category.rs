//! Category domain type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour given to categories created without one
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Categories seeded into an empty database: (name, colour)
pub const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("Work", "#3B82F6"),
    ("Personal", "#10B981"),
    ("Shopping", "#F59E0B"),
    ("Health", "#EF4444"),
    ("General", "#6B7280"),
];

/// A named label tasks can be organised under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}
