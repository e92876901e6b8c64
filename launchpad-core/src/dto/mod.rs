//! Data Transfer Objects for the task API
//!
//! Request and response bodies shared by the API server, the HTTP client
//! and the CLI. Every response carries the `success` envelope flag.

pub mod category;
pub mod task;

use serde::{Deserialize, Serialize};

/// Response carrying only a status message (e.g. after a delete)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Error body returned by the API on any failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// GET /api/health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: String,
}

/// GET /api/stats response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub completion_rate: f64,
}

impl StatsResponse {
    /// Builds statistics from raw counts, rounding the rate to two decimals
    pub fn from_counts(total: i64, completed: i64) -> Self {
        let completion_rate = if total > 0 {
            ((completed as f64 / total as f64) * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: total - completed,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let stats = StatsResponse::from_counts(0, 0);
        assert_eq!(stats.pending_tasks, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_stats_rounds_rate() {
        let stats = StatsResponse::from_counts(3, 1);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.completion_rate, 33.33);
    }
}
