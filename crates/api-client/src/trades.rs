use crate::client::ApiClient;
use crate::error::ApiError;
use core_types::{Order, OrderRequest, Position, Quote, Trade};
use uuid::Uuid;

/// Typed wrapper over the trading endpoints: order entry, open positions,
/// and two-sided quotes. Execution happens at the backend's venue adapters.
pub struct TradesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn trades(&self) -> TradesApi<'_> {
        TradesApi { client: self }
    }
}

impl TradesApi<'_> {
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.client.get_json("/trades/orders").await
    }

    pub async fn place(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        self.client.post_json("/trades/orders", request).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("/trades/orders/{id}/cancel"))
            .await
    }

    /// Lists executed fills, most recent first.
    pub async fn history(&self) -> Result<Vec<Trade>, ApiError> {
        self.client.get_json("/trades/history").await
    }

    pub async fn positions(&self) -> Result<Vec<Position>, ApiError> {
        self.client.get_json("/trades/positions").await
    }

    pub async fn quote(&self, symbol: &str) -> Result<Quote, ApiError> {
        self.client.get_json(&format!("/trades/quote/{symbol}")).await
    }
}
