//! # QuantDesk Core Types
//!
//! Foundational data structures shared by every crate in the workspace.
//! Each type mirrors a backend JSON shape exactly; the client performs no
//! derived computation on them. As the Layer 0 crate it depends on no other
//! workspace member.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{
    BacktestStatus, OrderSide, OrderStatus, OrderType, ProductStatus, ReportKind, SignalDirection,
    UserRole,
};
pub use error::CoreError;
pub use structs::{
    AnalyticsSummary, Backtest, BacktestMetrics, BacktestRequest, Candle, Order, OrderRequest,
    Portfolio, Position, PriceTick, Product, ProductVersion, Quote, Report, SignalEvaluation,
    Strategy, StrategyVersion, SymbolInfo, TokenPair, Trade, User, ValuePoint,
};
