//! Service status endpoints

use crate::TaskApiClient;
use crate::error::Result;
use launchpad_core::dto::{HealthResponse, StatsResponse};

impl TaskApiClient {
    /// GET /api/health
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.url("/api/health")).send().await?;

        self.handle_response(response).await
    }

    /// GET /api/stats
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response = self.client.get(self.url("/api/stats")).send().await?;

        self.handle_response(response).await
    }
}
