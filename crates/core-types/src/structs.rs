use crate::enums::{
    BacktestStatus, OrderSide, OrderStatus, OrderType, ProductStatus, ReportKind, SignalDirection,
    UserRole,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Every struct here mirrors a backend JSON shape one-to-one. The backend
// serializes camelCase; `#[serde(rename_all = "camelCase")]` maps that onto
// Rust snake_case without per-field annotations.

/// A platform user as returned by the profile and login endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// The access/refresh credential pair issued by the auth endpoints.
/// These two strings are the only state the client ever persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// A portfolio with its current holdings, valued by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: Uuid,
    pub name: String,
    pub base_currency: String,
    pub cash_balance: Decimal,
    pub total_value: Decimal,
    #[serde(default)]
    pub positions: Vec<Position>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single holding inside a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub quantity: Decimal,
    pub avg_entry_price: Decimal,
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
}

/// A trading strategy definition. The definition source is opaque text the
/// backend compiles and evaluates; the client never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub source: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One historical version of a strategy's definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyVersion {
    pub version: u32,
    pub source: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The backend's evaluation of a strategy's current signal for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEvaluation {
    pub symbol: String,
    pub direction: SignalDirection,
    /// Signal strength in [0, 1] as reported by the evaluation engine.
    pub strength: Decimal,
    pub as_of: DateTime<Utc>,
}

/// A backtest job. Simulation runs server-side; the client submits the run
/// request and polls this record until `status` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backtest {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub symbol: String,
    pub interval: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: Decimal,
    pub status: BacktestStatus,
    /// Completion percentage in [0, 100] while running.
    pub progress: Decimal,
    pub metrics: Option<BacktestMetrics>,
    pub created_at: DateTime<Utc>,
}

/// Summary performance figures for a completed backtest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestMetrics {
    pub total_return_pct: Decimal,
    pub max_drawdown_pct: Decimal,
    pub sharpe_ratio: Decimal,
    pub win_rate_pct: Decimal,
    pub total_trades: u32,
}

/// The request shape for submitting a new backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    pub strategy_id: Uuid,
    pub symbol: String,
    pub interval: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: Decimal,
}

/// A structured product assembled on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub product_type: String,
    pub underlyings: Vec<String>,
    pub notional: Decimal,
    pub strike: Option<Decimal>,
    pub barrier: Option<Decimal>,
    pub issue_date: Option<NaiveDate>,
    pub maturity_date: NaiveDate,
    pub status: ProductStatus,
    /// Most recent model price from the backend's pricing service.
    pub latest_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// One historical version of a product's terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVersion {
    pub version: u32,
    /// The full terms snapshot; schema owned by the backend.
    pub terms: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// An order as reported by the trading endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub limit_price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// The client -> server shape for placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub limit_price: Option<Decimal>,
}

/// A fill against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: Uuid,
    pub order_id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// A two-sided quote for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub bid: Decimal,
    pub ask: Decimal,
    pub last: Decimal,
    pub as_of: DateTime<Utc>,
}

/// The latest traded price for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTick {
    pub symbol: String,
    pub price: Decimal,
    pub change_pct: Decimal,
    pub as_of: DateTime<Utc>,
}

/// A single OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub interval: String,
}

/// A symbol-search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub asset_class: String,
}

/// A generated report available for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub kind: ReportKind,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub file_name: String,
}

/// Aggregate analytics over a portfolio's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub portfolio_id: Uuid,
    pub total_return_pct: Decimal,
    pub max_drawdown_pct: Decimal,
    pub volatility_pct: Decimal,
    pub value_series: Vec<ValuePoint>,
}

/// One point on a portfolio value curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn user_deserializes_from_backend_camel_case() {
        let json = r#"{
            "id": "7b7f6a2e-5b0e-4f6a-9f2a-0c9d1c2b3a4d",
            "email": "trader@example.com",
            "displayName": "Test Trader",
            "role": "TRADER",
            "createdAt": "2025-01-15T09:30:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.display_name, "Test Trader");
        assert_eq!(user.role, UserRole::Trader);
    }

    #[test]
    fn portfolio_positions_default_to_empty_when_absent() {
        let json = r#"{
            "id": "a0a0a0a0-0000-0000-0000-000000000001",
            "name": "Core",
            "baseCurrency": "USD",
            "cashBalance": "10000.50",
            "totalValue": "12500.00",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }"#;
        let p: Portfolio = serde_json::from_str(json).unwrap();
        assert!(p.positions.is_empty());
        assert_eq!(p.cash_balance, dec!(10000.50));
    }
}
