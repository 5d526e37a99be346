// In crates/engine/tests/common/mod.rs

#![allow(dead_code)]

use api_client::MarketDataSource;
use async_trait::async_trait;
use core_types::{Kline, Symbol, Ticker, Timeframe};
use engine::PollerSettings;
use indicators::StochRsiSettings;
use alerts::AlertSettings;
use notifier::Notifier;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).unwrap()
}

pub fn klines(closes: &[f64]) -> Vec<Kline> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open_time = i as i64 * 3_600_000;
            Kline {
                open_time,
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
                close_time: open_time + 3_599_999,
            }
        })
        .collect()
}

/// 80 falling closes followed by 20 flat ones. RSI is pinned at 0, so every
/// stochastic window is flat.
pub fn falling_then_flat() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..80).map(|i| 1_000.0 - i as f64 * 3.0).collect();
    closes.extend(std::iter::repeat_n(760.0, 20));
    closes
}

/// A wave that stops dead: the last 30 closes are identical.
pub fn wave_then_flat() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..70).map(|i| 1_000.0 + 25.0 * (i as f64 / 4.0).sin()).collect();
    let last = closes[69];
    closes.extend(std::iter::repeat_n(last, 30));
    closes
}

/// A choppy stretch followed by a steady decline; the latest RSI is the
/// window minimum, so %K ends at 0.
pub fn oversold_series() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 0 { 100.0 } else { 102.0 })
        .collect();
    closes.extend((1..=40).map(|i| 100.0 - i as f64));
    closes
}

/// A steady climb; %K ends high and never alerts.
pub fn rising_series() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40)
        .map(|i| if i % 2 == 0 { 100.0 } else { 98.0 })
        .collect();
    closes.extend((1..=40).map(|i| 100.0 + i as f64));
    closes
}

pub fn settings(symbols: &[&str], timeframes: &[Timeframe]) -> PollerSettings {
    PollerSettings {
        symbols: symbols.iter().map(|s| symbol(s)).collect(),
        timeframes: timeframes.to_vec(),
        poll_interval: Duration::from_secs(120),
        request_delay: Duration::ZERO,
        candle_limit: 100,
        oscillator: StochRsiSettings::default(),
        alerts: AlertSettings::default(),
    }
}

/// Canned exchange data keyed by symbol and timeframe.
#[derive(Default)]
pub struct StubSource {
    pub tickers: Mutex<HashMap<Symbol, Ticker>>,
    pub candles: Mutex<HashMap<(Symbol, Timeframe), Vec<f64>>>,
    pub fail_tickers: AtomicBool,
    /// Simulated latency of every candle request.
    pub latency: Option<Duration>,
    pub ticker_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl StubSource {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn set_ticker(&self, raw: &str, last: f64, percentage: f64) {
        self.tickers
            .lock()
            .unwrap()
            .insert(symbol(raw), Ticker { last, percentage });
    }

    pub fn set_closes(&self, raw: &str, timeframe: Timeframe, closes: Vec<f64>) {
        self.candles
            .lock()
            .unwrap()
            .insert((symbol(raw), timeframe), closes);
    }
}

impl StubSource {
    pub fn clear_closes(&self, raw: &str, timeframe: Timeframe) {
        self.candles.lock().unwrap().remove(&(symbol(raw), timeframe));
    }
}

#[async_trait]
impl MarketDataSource for StubSource {
    async fn fetch_tickers(&self, symbols: &[Symbol]) -> api_client::Result<HashMap<Symbol, Ticker>> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tickers.load(Ordering::SeqCst) {
            return Err(api_client::Error::ApiError {
                code: -1003,
                msg: "Too many requests".to_string(),
            });
        }
        let tickers = self.tickers.lock().unwrap();
        Ok(symbols
            .iter()
            .filter_map(|s| tickers.get(s).map(|t| (s.clone(), *t)))
            .collect())
    }

    async fn fetch_ohlcv(&self, symbol: &Symbol, timeframe: Timeframe, _limit: u16) -> api_client::Result<Vec<Kline>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let closes = self.candles.lock().unwrap().get(&(symbol.clone(), timeframe)).cloned();
        match closes {
            Some(closes) => Ok(klines(&closes)),
            None => Err(api_client::Error::ApiError {
                code: -1121,
                msg: "Invalid symbol.".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Push { symbol: Symbol, k: f64, timeframe: Timeframe },
    Email { symbol: Symbol, k: f64, price: Option<f64>, timeframe: Timeframe },
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn pushes_for(&self, raw: &str) -> usize {
        let wanted = symbol(raw);
        self.sent()
            .iter()
            .filter(|s| matches!(s, Sent::Push { symbol, .. } if *symbol == wanted))
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_push(&self, symbol: &Symbol, current_k: f64, timeframe: Timeframe) {
        self.sent.lock().unwrap().push(Sent::Push {
            symbol: symbol.clone(),
            k: current_k,
            timeframe,
        });
    }

    async fn notify_email(&self, symbol: &Symbol, current_k: f64, price: Option<f64>, timeframe: Timeframe) {
        self.sent.lock().unwrap().push(Sent::Email {
            symbol: symbol.clone(),
            k: current_k,
            price,
            timeframe,
        });
    }
}
