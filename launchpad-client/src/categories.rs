//! Category endpoints

use crate::TaskApiClient;
use crate::error::Result;
use launchpad_core::dto::category::{CategoryListResponse, CategoryResponse, CreateCategory};

impl TaskApiClient {
    /// List all categories
    pub async fn list_categories(&self) -> Result<CategoryListResponse> {
        let response = self.client.get(self.url("/api/categories")).send().await?;

        self.handle_response(response).await
    }

    /// Create a category
    pub async fn create_category(&self, request: CreateCategory) -> Result<CategoryResponse> {
        let response = self
            .client
            .post(self.url("/api/categories"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
