use crate::client::ApiClient;
use crate::error::ApiError;
use core_types::Portfolio;
use serde::Serialize;
use uuid::Uuid;

/// The body for creating a portfolio.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolioRequest {
    pub name: String,
    pub base_currency: String,
}

/// Typed wrapper over the portfolio endpoints. Pure request/response glue;
/// valuation happens server-side.
pub struct PortfoliosApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn portfolios(&self) -> PortfoliosApi<'_> {
        PortfoliosApi { client: self }
    }
}

impl PortfoliosApi<'_> {
    pub async fn list(&self) -> Result<Vec<Portfolio>, ApiError> {
        self.client.get_json("/portfolios").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Portfolio, ApiError> {
        self.client.get_json(&format!("/portfolios/{id}")).await
    }

    pub async fn create(&self, request: &CreatePortfolioRequest) -> Result<Portfolio, ApiError> {
        self.client.post_json("/portfolios", request).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete_unit(&format!("/portfolios/{id}")).await
    }
}
