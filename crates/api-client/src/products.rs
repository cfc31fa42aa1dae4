use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::{Product, ProductVersion};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// The body for building a structured product draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub product_type: String,
    pub underlyings: Vec<String>,
    pub notional: Decimal,
    pub strike: Option<Decimal>,
    pub barrier: Option<Decimal>,
    pub maturity_date: NaiveDate,
}

/// Typed wrapper over the structured-product endpoints. Pricing and term
/// validation live in the backend's pricing service.
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }
}

impl ProductsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.client.get_json("/products").await
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, ApiError> {
        self.client.get_json(&format!("/products/{id}")).await
    }

    pub async fn create(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        self.client.post_json("/products", request).await
    }

    /// Moves a draft product to issued. The backend stamps the issue date.
    pub async fn issue(&self, id: Uuid) -> Result<Product, ApiError> {
        self.client
            .post_empty_json(&format!("/products/{id}/issue"))
            .await
    }

    /// Requests a fresh model price for the product.
    pub async fn reprice(&self, id: Uuid) -> Result<Product, ApiError> {
        self.client
            .post_empty_json(&format!("/products/{id}/reprice"))
            .await
    }

    pub async fn versions(&self, id: Uuid) -> Result<Vec<ProductVersion>, ApiError> {
        self.client
            .get_json(&format!("/products/{id}/versions"))
            .await
    }
}
