// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::Deserialize;

/// The client for the Binance spot REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL for the REST API (e.g., "https://api.binance.com").
    pub base_url: String,
}

/// Temporary struct to deserialize the kline response from Binance,
/// which is a JSON array of mixed types.
#[derive(Debug, Deserialize)]
pub struct RawKline(
    pub i64,         // 0: Open time
    pub String,      // 1: Open
    pub String,      // 2: High
    pub String,      // 3: Low
    pub String,      // 4: Close
    pub String,      // 5: Volume
    pub i64,         // 6: Close time
    pub String,      // 7: Quote asset volume
    pub i64,         // 8: Number of trades
    pub String,      // 9: Taker buy base asset volume
    pub String,      // 10: Taker buy quote asset volume
    pub String,      // 11: Ignore
);

/// One entry of the `GET /api/v3/ticker/24hr` response.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawTicker24h {
    /// Exchange code of the pair (e.g., "BTCTRY").
    pub symbol: String,
    pub last_price: String,
    pub price_change_percent: String,
}

/// The error object Binance returns instead of the expected payload.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
