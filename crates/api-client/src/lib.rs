// In crates/api-client/src/lib.rs

use app_config::types::ExchangeSettings;
use async_trait::async_trait;
use core_types::{Kline, Symbol, Ticker, Timeframe};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

pub mod error;
pub mod source;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use source::MarketDataSource;
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from ExchangeSettings.
    pub fn new(settings: &ExchangeSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        let base_url = settings.rest_base_url.trim_end_matches('/').to_string();
        Ok(ApiClient {
            http_client,
            base_url,
        })
    }

    /// Fetches 24h ticker statistics for several symbols in one request.
    ///
    /// This corresponds to the `GET /api/v3/ticker/24hr?symbols=[...]` endpoint.
    pub async fn get_tickers(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, Ticker>> {
        let codes: Vec<String> = symbols.iter().map(Symbol::exchange_code).collect();
        let symbols_param = serde_json::to_string(&codes)?;
        let url = Url::parse_with_params(
            &format!("{}/api/v3/ticker/24hr", self.base_url),
            &[("symbols", symbols_param.as_str())],
        )
        .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let body = self.get_text(url).await?;
        let raw: Vec<RawTicker24h> = parse_response(&body)?;
        tickers_from_raw(symbols, raw)
    }

    /// Fetches the most recent kline (candlestick) data.
    ///
    /// This corresponds to the `GET /api/v3/klines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The symbol to fetch klines for.
    /// * `interval`: The kline interval.
    /// * `limit`: Number of klines to return (max 1000).
    pub async fn get_klines(&self, symbol: &Symbol, interval: Timeframe, limit: u16) -> Result<Vec<Kline>> {
        let limit = limit.to_string();
        let code = symbol.exchange_code();
        let url = Url::parse_with_params(
            &format!("{}/api/v3/klines", self.base_url),
            &[
                ("symbol", code.as_str()),
                ("interval", interval.as_str()),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let body = self.get_text(url).await?;
        let raw: Vec<RawKline> = parse_response(&body)?;
        raw.into_iter().map(kline_from_raw).collect()
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        tracing::debug!(url = %url, "Sending exchange request.");
        let text = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(Error::RequestFailed)?
            .text()
            .await
            .map_err(Error::RequestFailed)?;
        Ok(text)
    }
}

#[async_trait]
impl MarketDataSource for ApiClient {
    async fn fetch_tickers(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, Ticker>> {
        self.get_tickers(symbols).await
    }

    async fn fetch_ohlcv(&self, symbol: &Symbol, timeframe: Timeframe, limit: u16) -> Result<Vec<Kline>> {
        self.get_klines(symbol, timeframe, limit).await
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &ExchangeSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

/// Deserializes an exchange response, surfacing Binance error objects as `ApiError`.
fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str::<T>(body).map_err(|e| {
        // If deserialization fails, it might be a Binance error object.
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => Error::ApiError { code: err.code, msg: err.msg },
            Err(_) => Error::DeserializationFailed(e),
        }
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| Error::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn tickers_from_raw(symbols: &[Symbol], raw: Vec<RawTicker24h>) -> Result<HashMap<Symbol, Ticker>> {
    let by_code: HashMap<String, &Symbol> = symbols.iter().map(|s| (s.exchange_code(), s)).collect();

    let mut tickers = HashMap::with_capacity(raw.len());
    for entry in raw {
        let Some(symbol) = by_code.get(&entry.symbol) else {
            tracing::debug!(code = %entry.symbol, "Ignoring ticker for unrequested symbol.");
            continue;
        };
        let ticker = Ticker {
            last: parse_number("lastPrice", &entry.last_price)?,
            percentage: parse_number("priceChangePercent", &entry.price_change_percent)?,
        };
        tickers.insert((*symbol).clone(), ticker);
    }
    Ok(tickers)
}

fn kline_from_raw(raw: RawKline) -> Result<Kline> {
    Ok(Kline {
        open_time: raw.0,
        open: parse_number("open", &raw.1)?,
        high: parse_number("high", &raw.2)?,
        low: parse_number("low", &raw.3)?,
        close: parse_number("close", &raw.4)?,
        volume: parse_number("volume", &raw.5)?,
        close_time: raw.6,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<Symbol> {
        vec![Symbol("BTC/TRY".to_string()), Symbol("ETH/TRY".to_string())]
    }

    #[test]
    fn tickers_are_mapped_back_to_configured_symbols() {
        let body = r#"[
            {"symbol":"BTCTRY","lastPrice":"3150000.50","priceChangePercent":"-1.25","volume":"12.0"},
            {"symbol":"XRPTRY","lastPrice":"20.1","priceChangePercent":"0.5"}
        ]"#;
        let raw: Vec<RawTicker24h> = parse_response(body).unwrap();
        let tickers = tickers_from_raw(&symbols(), raw).unwrap();

        assert_eq!(tickers.len(), 1);
        let btc = tickers[&symbols()[0]];
        assert_eq!(btc.last, 3_150_000.5);
        assert_eq!(btc.percentage, -1.25);
        assert!(!tickers.contains_key(&symbols()[1]));
    }

    #[test]
    fn binance_error_body_becomes_api_error() {
        let body = r#"{"code":-1121,"msg":"Invalid symbol."}"#;
        match parse_response::<Vec<RawTicker24h>>(body) {
            Err(Error::ApiError { code, msg }) => {
                assert_eq!(code, -1121);
                assert_eq!(msg, "Invalid symbol.");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn garbage_body_is_a_deserialization_error() {
        let result = parse_response::<Vec<RawKline>>("<html>bad gateway</html>");
        assert!(matches!(result, Err(Error::DeserializationFailed(_))));
    }

    #[test]
    fn klines_parse_into_floats() {
        let body = r#"[[1700000000000,"10.0","12.5","9.5","11.25","100.0",1700003599999,"1100.0",42,"50.0","550.0","0"]]"#;
        let raw: Vec<RawKline> = parse_response(body).unwrap();
        let klines: Vec<Kline> = raw.into_iter().map(kline_from_raw).collect::<Result<_>>().unwrap();

        assert_eq!(klines.len(), 1);
        assert_eq!(klines[0].close, 11.25);
        assert_eq!(klines[0].high, 12.5);
        assert_eq!(klines[0].close_time, 1_700_003_599_999);
    }

    #[test]
    fn unparsable_price_is_rejected() {
        let raw = RawKline(
            0, "1".into(), "1".into(), "1".into(), "n/a".into(), "1".into(), 0,
            "0".into(), 0, "0".into(), "0".into(), "0".into(),
        );
        assert!(matches!(
            kline_from_raw(raw),
            Err(Error::InvalidNumber { field: "close", .. })
        ));
    }

    #[test]
    fn client_strips_trailing_slash_from_base_url() {
        let settings = ExchangeSettings {
            rest_base_url: "https://api.binance.com/".to_string(),
            ..ExchangeSettings::default()
        };
        let client = ApiClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "https://api.binance.com");
    }
}
