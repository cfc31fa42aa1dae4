use crate::client::ApiClient;
use crate::error::ApiError;
use core_types::{Candle, PriceTick, SymbolInfo};
use serde::Serialize;
use url::form_urlencoded;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchPriceRequest<'a> {
    symbols: &'a [String],
}

/// Typed wrapper over the market-data endpoints.
///
/// Live-price display polls `price` on a fixed interval; there is no
/// streaming channel. `prices` covers watchlists in one round trip.
pub struct MarketDataApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn market_data(&self) -> MarketDataApi<'_> {
        MarketDataApi { client: self }
    }
}

impl MarketDataApi<'_> {
    pub async fn price(&self, symbol: &str) -> Result<PriceTick, ApiError> {
        self.client.get_json(&format!("/market/price/{symbol}")).await
    }

    /// Fetches prices for a whole watchlist via the batch endpoint.
    pub async fn prices(&self, symbols: &[String]) -> Result<Vec<PriceTick>, ApiError> {
        self.client
            .post_json("/market/prices", &BatchPriceRequest { symbols })
            .await
    }

    pub async fn ohlcv(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, ApiError> {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("interval", interval)
            .append_pair("limit", &limit.to_string())
            .finish();
        self.client
            .get_json(&format!("/market/ohlcv/{symbol}?{query}"))
            .await
    }

    /// Free-text symbol search. The query is percent-encoded; the backend
    /// matches against symbol, name, and exchange.
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolInfo>, ApiError> {
        let encoded: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .finish();
        self.client.get_json(&format!("/market/search?{encoded}")).await
    }
}
