//! Task domain types

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned when a task is created without one
pub const DEFAULT_CATEGORY: &str = "general";

/// A task stored by the task API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "Invalid priority '{}': expected low, medium or high",
                other
            )),
        }
    }
}

/// Parses a due date in ISO-8601 form
///
/// Accepts RFC 3339 timestamps (`2025-01-31T09:00:00Z`), naive timestamps
/// (`2025-01-31T09:00:00`, taken as UTC) and plain dates (`2025-01-31`,
/// midnight UTC).
pub fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_priority_parse() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        let json = serde_json::to_string(&Priority::Low).unwrap();
        assert_eq!(json, "\"low\"");
    }

    #[test]
    fn test_parse_due_date_forms() {
        let zulu = parse_due_date("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(zulu.hour(), 10);

        let offset = parse_due_date("2025-03-01T10:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let naive = parse_due_date("2025-03-01T10:30:00").unwrap();
        assert_eq!(naive, zulu);

        let date = parse_due_date("2025-03-01").unwrap();
        assert_eq!(date.day(), 1);
        assert_eq!(date.hour(), 0);

        assert!(parse_due_date("next tuesday").is_none());
    }
}
