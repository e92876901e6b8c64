//! Task endpoints

use crate::TaskApiClient;
use crate::error::Result;
use launchpad_core::dto::MessageResponse;
use launchpad_core::dto::task::{CreateTask, TaskFilter, TaskListResponse, TaskResponse, UpdateTask};

impl TaskApiClient {
    // =============================================================================
    // Task Query
    // =============================================================================

    /// List tasks matching the filter, newest first
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<TaskListResponse> {
        let response = self
            .client
            .get(self.url("/api/tasks"))
            .query(filter)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a single task
    pub async fn get_task(&self, id: i64) -> Result<TaskResponse> {
        let url = self.url(&format!("/api/tasks/{}", id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Task Mutation
    // =============================================================================

    /// Create a task
    pub async fn create_task(&self, request: CreateTask) -> Result<TaskResponse> {
        let response = self
            .client
            .post(self.url("/api/tasks"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Apply a partial update to a task
    pub async fn update_task(&self, id: i64, request: UpdateTask) -> Result<TaskResponse> {
        let url = self.url(&format!("/api/tasks/{}", id));
        let response = self.client.put(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Delete a task
    pub async fn delete_task(&self, id: i64) -> Result<MessageResponse> {
        let url = self.url(&format!("/api/tasks/{}", id));
        let response = self.client.delete(&url).send().await?;

        self.handle_response(response).await
    }
}
