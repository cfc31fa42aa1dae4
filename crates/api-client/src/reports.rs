use crate::client::ApiClient;
use crate::error::ApiError;
use bytes::Bytes;
use chrono::NaiveDate;
use core_types::{AnalyticsSummary, Report, ReportKind};
use serde::Serialize;
use uuid::Uuid;

/// The body for requesting report generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub kind: ReportKind,
    pub portfolio_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Typed wrapper over the analytics and reporting endpoints.
pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi { client: self }
    }
}

impl ReportsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Report>, ApiError> {
        self.client.get_json("/reports").await
    }

    pub async fn generate(&self, request: &GenerateReportRequest) -> Result<Report, ApiError> {
        self.client.post_json("/reports", request).await
    }

    pub async fn summary(&self, portfolio_id: Uuid) -> Result<AnalyticsSummary, ApiError> {
        self.client
            .get_json(&format!("/reports/analytics/{portfolio_id}"))
            .await
    }

    /// Downloads the rendered report file as a raw byte buffer.
    pub async fn download(&self, id: Uuid) -> Result<Bytes, ApiError> {
        self.client.get_bytes(&format!("/reports/{id}/download")).await
    }
}
