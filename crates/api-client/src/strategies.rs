use crate::client::ApiClient;
use crate::error::ApiError;
use core_types::{SignalEvaluation, Strategy, StrategyVersion};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStrategyRequest {
    pub name: String,
    pub description: String,
    pub source: String,
}

/// The body for updating a strategy. Every update creates a new version
/// server-side; the optional comment labels it in the version history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStrategyRequest {
    pub source: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest<'a> {
    symbols: &'a [String],
}

/// Typed wrapper over the strategy endpoints. Signal evaluation runs on the
/// backend's engine; the client only ships the symbol list.
pub struct StrategiesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn strategies(&self) -> StrategiesApi<'_> {
        StrategiesApi { client: self }
    }
}

impl StrategiesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Strategy>, ApiError> {
        self.client.get_json("/strategies").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Strategy, ApiError> {
        self.client.get_json(&format!("/strategies/{id}")).await
    }

    pub async fn create(&self, request: &CreateStrategyRequest) -> Result<Strategy, ApiError> {
        self.client.post_json("/strategies", request).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateStrategyRequest,
    ) -> Result<Strategy, ApiError> {
        self.client
            .put_json(&format!("/strategies/{id}"), request)
            .await
    }

    pub async fn versions(&self, id: Uuid) -> Result<Vec<StrategyVersion>, ApiError> {
        self.client
            .get_json(&format!("/strategies/{id}/versions"))
            .await
    }

    pub async fn evaluate(
        &self,
        id: Uuid,
        symbols: &[String],
    ) -> Result<Vec<SignalEvaluation>, ApiError> {
        self.client
            .post_json(
                &format!("/strategies/{id}/evaluate"),
                &EvaluateRequest { symbols },
            )
            .await
    }
}
