// In app/src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_types::{MarketSnapshot, Symbol, Timeframe};
use engine::{Poller, PollerSettings};
use notifier::{Dispatcher, MailSender, PushSender, SubscriptionStore};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use web_server::{AppState, DashboardSettings};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Polls an exchange, tracks Stochastic RSI per pair and alerts on oversold readings.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the poll loop and the dashboard server (the default).
    Run,

    /// Computes the oscillator once for a single pair and prints it.
    Scan {
        /// The pair to scan (e.g., "BTC/TRY").
        #[arg(short, long)]
        symbol: String,

        /// The candle timeframe (e.g., "1h", "4h").
        #[arg(short, long, default_value = "1h")]
        timeframe: Timeframe,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Settings are loaded before logging so the configured level applies;
    // a load failure is still reported through tracing.
    let settings = app_config::load_settings();
    init_tracing(
        settings
            .as_ref()
            .map(|s| s.app.log_level.as_str())
            .unwrap_or("info"),
    );
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Configuration is invalid; refusing to start.");
            return Err(e).context("Failed to load configuration");
        }
    };
    tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_app(settings).await,
        Commands::Scan { symbol, timeframe } => handle_scan(&settings, &symbol, timeframe).await,
    }
}

fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- "Run" Subcommand Logic ---

async fn run_app(settings: app_config::Settings) -> Result<()> {
    // --- 1. Shared state ---
    let snapshot = MarketSnapshot::shared();
    let subscriptions = SubscriptionStore::new();

    // --- 2. Component Instantiation ---
    let push = settings
        .notifications
        .push
        .clone()
        .map(|push| PushSender::new(push, subscriptions.clone()));
    let mail = settings
        .notifications
        .email
        .as_ref()
        .map(MailSender::new)
        .transpose()
        .context("Invalid email settings")?;
    let dispatcher = Dispatcher::new(push, mail);
    if !dispatcher.push_enabled() {
        tracing::warn!("Push notifications disabled: no [notifications.push] settings.");
    }
    if !dispatcher.mail_enabled() {
        tracing::warn!("Email notifications disabled: no [notifications.email] settings.");
    }

    let api_client = api_client::new(&settings.exchange)?;
    let poller_settings = PollerSettings::from_settings(&settings)?;

    let view = DashboardSettings {
        symbols: poller_settings.symbols.clone(),
        timeframes: poller_settings.timeframes.clone(),
        trade_url_base: settings.exchange.trade_url_base.clone(),
        quote_label: settings.exchange.quote_label.clone(),
        refresh_seconds: settings.server.refresh_seconds,
        vapid_public_key: settings
            .notifications
            .push
            .as_ref()
            .map(|p| p.vapid_public_key.clone()),
    };
    let app_state = AppState {
        snapshot: snapshot.clone(),
        subscriptions,
        view: Arc::new(view),
    };

    let mut poller = Poller::new(poller_settings, Arc::new(api_client), Arc::new(dispatcher), snapshot);

    // --- 3. Launch Concurrent Tasks ---
    tracing::info!("Launching poll loop and web server tasks...");

    let poller_handle = tokio::spawn(async move { poller.run().await });
    let server_settings = settings.server.clone();
    let server_handle = tokio::spawn(async move { web_server::run(&server_settings, app_state).await });

    // In a healthy state, neither task completes.
    tokio::select! {
        poller_result = poller_handle => {
            tracing::error!(?poller_result, "Poll loop task has terminated unexpectedly.");
        }
        server_result = server_handle => {
            tracing::error!(?server_result, "Web server task has terminated unexpectedly.");
        }
    }

    anyhow::bail!("A critical task terminated. Shutting down.");
}

// --- "Scan" Subcommand Logic ---

async fn handle_scan(settings: &app_config::Settings, raw_symbol: &str, timeframe: Timeframe) -> Result<()> {
    let symbol = Symbol::parse(raw_symbol)?;
    let client = api_client::new(&settings.exchange)?;

    let result = engine::scan_symbol(
        &client,
        &symbol,
        timeframe,
        settings.exchange.candle_limit,
        &settings.oscillator,
        &settings.alerts,
    )
    .await?;

    match result.state {
        Some(state) => println!(
            "{} {}: %K {:.2} %D {:.2} {} {} ({} candles)",
            symbol,
            timeframe,
            state.current_k,
            state.current_d,
            state.trend.arrow(),
            state.status.label(),
            result.candles
        ),
        None => println!(
            "{} {}: not enough data ({} candles, {} oscillator points)",
            symbol,
            timeframe,
            result.candles,
            result.points.len()
        ),
    }

    Ok(())
}
