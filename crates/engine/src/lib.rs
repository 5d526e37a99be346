// In crates/engine/src/lib.rs

pub mod error;
pub mod scan;

use alerts::{AlertPolicy, AlertSettings, derive_timeframe_state};
use api_client::MarketDataSource;
use app_config::Settings;
use chrono::{DateTime, Utc};
use core_types::{SharedSnapshot, Symbol, Timeframe, TimeframeState};
use indicators::{StochRsiSettings, latest_pair, stoch_rsi};
use notifier::Notifier;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};

pub use error::{Error, Result};
pub use scan::{ScanResult, scan_symbol};

/// Everything the poll loop needs, resolved from the application settings.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub symbols: Vec<Symbol>,
    pub timeframes: Vec<Timeframe>,
    pub poll_interval: Duration,
    /// Fixed pause before every candle request (crude rate limiting).
    pub request_delay: Duration,
    pub candle_limit: u16,
    pub oscillator: StochRsiSettings,
    pub alerts: AlertSettings,
}

impl PollerSettings {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let symbols = settings
            .market
            .symbols()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;
        Ok(Self {
            symbols,
            timeframes: settings.market.timeframes.clone(),
            poll_interval: Duration::from_secs(settings.market.poll_interval_secs),
            request_delay: Duration::from_millis(settings.exchange.request_delay_ms),
            candle_limit: settings.exchange.candle_limit,
            oscillator: settings.oscillator,
            alerts: settings.alerts.clone(),
        })
    }
}

/// Counters for one completed poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub symbols_updated: usize,
    pub timeframes_updated: usize,
    pub timeframes_skipped: usize,
    pub alerts_fired: usize,
}

/// Why a symbol/timeframe produced no update this cycle.
#[derive(Debug)]
enum Skip {
    Fetch(api_client::Error),
    Indicator(indicators::Error),
    NotActionable(usize),
}

/// The poll loop: the only writer of the market snapshot and the sole owner
/// of the alert cooldown book.
pub struct Poller {
    settings: PollerSettings,
    source: Arc<dyn MarketDataSource>,
    notifier: Arc<dyn Notifier>,
    snapshot: SharedSnapshot,
    policy: AlertPolicy,
}

impl Poller {
    pub fn new(
        settings: PollerSettings,
        source: Arc<dyn MarketDataSource>,
        notifier: Arc<dyn Notifier>,
        snapshot: SharedSnapshot,
    ) -> Self {
        let policy = AlertPolicy::new(settings.alerts.clone());
        Self {
            settings,
            source,
            notifier,
            snapshot,
            policy,
        }
    }

    /// Runs a cycle immediately, then one per `poll_interval`, forever.
    ///
    /// Cycles are awaited inline, so they never overlap; ticks missed while
    /// a slow cycle is still running are dropped.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(
            symbols = self.settings.symbols.len(),
            timeframes = self.settings.timeframes.len(),
            interval = ?self.settings.poll_interval,
            "Starting poll loop."
        );

        let mut ticker = interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(report) => tracing::info!(
                    symbols = report.symbols_updated,
                    updated = report.timeframes_updated,
                    skipped = report.timeframes_skipped,
                    alerts = report.alerts_fired,
                    "Poll cycle finished."
                ),
                Err(e) => tracing::warn!(error = %e, "Poll cycle failed; snapshot left unchanged."),
            }
        }
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        self.run_cycle_at(Utc::now()).await
    }

    /// One full pass over all symbols and timeframes, stamped with `now`.
    ///
    /// A ticker failure aborts the pass before anything is written. Candle
    /// or indicator problems only skip the affected symbol/timeframe.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport> {
        // --- 1. Fetching tickers ---
        let tickers = self
            .source
            .fetch_tickers(&self.settings.symbols)
            .await
            .map_err(Error::TickerFetch)?;

        let symbols = self.settings.symbols.clone();
        let timeframes = self.settings.timeframes.clone();
        let mut report = CycleReport::default();

        for symbol in &symbols {
            let ticker = tickers.get(symbol);
            if ticker.is_none() {
                tracing::warn!(symbol = %symbol, "No ticker returned; price shown as N/A.");
            }
            self.snapshot.write().await.record_ticker(symbol, ticker, now);
            report.symbols_updated += 1;

            let price = ticker.map(|t| t.last);
            for &timeframe in &timeframes {
                if !self.settings.request_delay.is_zero() {
                    sleep(self.settings.request_delay).await;
                }

                // --- 2. Computing & dispatching ---
                match self.process_timeframe(symbol, timeframe, price, now).await {
                    Ok(alerted) => {
                        report.timeframes_updated += 1;
                        if alerted {
                            report.alerts_fired += 1;
                        }
                    }
                    Err(skip) => {
                        report.timeframes_skipped += 1;
                        log_skip(symbol, timeframe, &skip);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Fetches, computes and stores one timeframe; returns whether an alert fired.
    async fn process_timeframe(
        &mut self,
        symbol: &Symbol,
        timeframe: Timeframe,
        price: Option<f64>,
        now: DateTime<Utc>,
    ) -> std::result::Result<bool, Skip> {
        let klines = self
            .source
            .fetch_ohlcv(symbol, timeframe, self.settings.candle_limit)
            .await
            .map_err(Skip::Fetch)?;
        let closes: Vec<f64> = klines.iter().map(|k| k.close).collect();

        let state = evaluate_closes(&closes, &self.settings.oscillator, self.policy.settings(), now)?;
        self.snapshot.write().await.merge_timeframe(symbol, timeframe, state);

        if !self.policy.evaluate(symbol, timeframe, state.current_k, now) {
            return Ok(false);
        }

        tracing::info!(
            symbol = %symbol,
            timeframe = %timeframe,
            current_k = state.current_k,
            "Oversold alert fired."
        );
        self.notifier.notify_push(symbol, state.current_k, timeframe).await;
        self.notifier
            .notify_email(symbol, state.current_k, price, timeframe)
            .await;
        Ok(true)
    }
}

/// Runs the oscillator over a close series and derives the display state.
fn evaluate_closes(
    closes: &[f64],
    oscillator: &StochRsiSettings,
    alerts: &AlertSettings,
    now: DateTime<Utc>,
) -> std::result::Result<TimeframeState, Skip> {
    let points = stoch_rsi(closes, oscillator).map_err(Skip::Indicator)?;
    let (previous, current) = latest_pair(&points).ok_or(Skip::NotActionable(points.len()))?;
    Ok(derive_timeframe_state(previous, current, alerts, now))
}

fn log_skip(symbol: &Symbol, timeframe: Timeframe, skip: &Skip) {
    match skip {
        Skip::Fetch(e) => {
            tracing::warn!(symbol = %symbol, timeframe = %timeframe, error = %e, "Candle fetch failed; skipping.")
        }
        Skip::Indicator(e) => {
            tracing::debug!(symbol = %symbol, timeframe = %timeframe, error = %e, "Not enough data for oscillator.")
        }
        Skip::NotActionable(points) => {
            tracing::debug!(symbol = %symbol, timeframe = %timeframe, points, "Fewer than two oscillator points.")
        }
    }
}
