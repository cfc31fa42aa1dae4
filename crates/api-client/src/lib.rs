//! # QuantDesk API Client
//!
//! The authenticated HTTP client for the QuantDesk platform backend, and the
//! only place in the workspace that talks to the network.
//!
//! ## Architectural Principles
//!
//! - **One client, many wrappers:** a single [`ApiClient`] owns the HTTP
//!   connection pool, base URL, and token store; every domain surface
//!   (portfolios, strategies, backtests, products, trades, market data,
//!   reports) is a thin typed wrapper borrowed from it. No module constructs
//!   its own transport.
//! - **Silent recovery, loud expiry:** an expired access token is recovered
//!   transparently with exactly one refresh-and-retry cycle per request.
//!   When recovery fails the stored credentials are cleared and a
//!   [`events::SessionEvent::Expired`] broadcast tells subscribers the
//!   session is gone; transport code itself never touches presentation.
//! - **Storage behind a trait:** [`TokenStore`] hides where the two
//!   credential strings live ([`FileTokenStore`] on disk,
//!   [`MemoryTokenStore`] for tests). Nothing outside this crate reads them.
//!
//! ## Public API
//!
//! - `ApiClient`: the shared transport and wrapper factory.
//! - `AuthApi`: the authentication contract the session manager consumes.
//! - `TokenStore` / `FileTokenStore` / `MemoryTokenStore`: credential storage.
//! - `ApiError`: the specific error types that can be returned from this crate.

// Declare the modules that make up this crate.
pub mod auth;
pub mod backtests;
pub mod client;
pub mod error;
pub mod market_data;
pub mod portfolios;
pub mod products;
pub mod reports;
pub mod responses;
pub mod strategies;
pub mod token_store;
pub mod trades;

// Re-export the key components to provide a clean, public-facing API.
pub use auth::{AuthApi, Credentials, RegisterRequest};
pub use backtests::BacktestsApi;
pub use client::ApiClient;
pub use error::ApiError;
pub use market_data::MarketDataApi;
pub use portfolios::{CreatePortfolioRequest, PortfoliosApi};
pub use products::{CreateProductRequest, ProductsApi};
pub use reports::{GenerateReportRequest, ReportsApi};
pub use responses::{ApiEnvelope, LoginResponse};
pub use strategies::{CreateStrategyRequest, StrategiesApi, UpdateStrategyRequest};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use trades::TradesApi;
