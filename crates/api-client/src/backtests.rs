use crate::client::ApiClient;
use crate::error::ApiError;
use core_types::{Backtest, BacktestRequest};
use uuid::Uuid;

/// Typed wrapper over the backtest endpoints.
///
/// A backtest is a server-side job: `run` enqueues it and returns the
/// initial record, after which callers poll `get` until
/// [`core_types::BacktestStatus::is_terminal`] holds. The client performs no
/// simulation of its own.
pub struct BacktestsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn backtests(&self) -> BacktestsApi<'_> {
        BacktestsApi { client: self }
    }
}

impl BacktestsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Backtest>, ApiError> {
        self.client.get_json("/backtests").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Backtest, ApiError> {
        self.client.get_json(&format!("/backtests/{id}")).await
    }

    pub async fn run(&self, request: &BacktestRequest) -> Result<Backtest, ApiError> {
        self.client.post_json("/backtests", request).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .post_unit(&format!("/backtests/{id}/cancel"))
            .await
    }
}
