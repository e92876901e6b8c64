//! Launchpad HTTP Client
//!
//! A simple, type-safe HTTP client for the deployed task API.
//!
//! The CLI uses the typed endpoints (`health`, `stats`, tasks, categories)
//! for operator commands; the pipeline's verification phase uses
//! [`TaskApiClient::get_raw`], which reports every status code instead of
//! turning non-2xx responses into errors.
//!
//! # Example
//!
//! ```no_run
//! use launchpad_client::TaskApiClient;
//! use launchpad_core::dto::task::CreateTask;
//!
//! #[tokio::main]
//! async fn main() -> launchpad_client::Result<()> {
//!     let client = TaskApiClient::new("http://203.0.113.10");
//!
//!     let created = client.create_task(CreateTask::titled("Buy milk")).await?;
//!
//!     println!("Created task: {}", created.task.id);
//!     Ok(())
//! }
//! ```

mod categories;
pub mod error;
mod status;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the task API
///
/// Methods are organized into logical groups:
/// - Service status (health, stats, raw probes)
/// - Task CRUD
/// - Categories
#[derive(Debug, Clone)]
pub struct TaskApiClient {
    /// Base URL of the deployment (e.g., "http://203.0.113.10")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

/// Status and body of a response, whatever the status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// True for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl TaskApiClient {
    /// Create a new client with reqwest's default settings
    ///
    /// # Example
    /// ```
    /// use launchpad_client::TaskApiClient;
    ///
    /// let client = TaskApiClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client whose connections give up after `connect_timeout`
    /// and whose requests give up after `request_timeout`
    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the deployment
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GET a path and return status and body without judging the status
    ///
    /// Only transport failures (connection refused, timeouts) are errors.
    pub async fn get_raw(&self, path: &str) -> Result<RawResponse> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Pulls `error` out of the API's JSON error envelope, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<launchpad_core::dto::ErrorResponse>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_else(|_| body.to_string())
}
