// In crates/web-server/src/dashboard.rs

use std::fmt::Write;

use core_types::{MarketSnapshot, OscillatorStatus, Symbol, SymbolState, Timeframe, TimeframeState, TrendDirection};

const UP_COLOR: &str = "#00e676";
const DOWN_COLOR: &str = "#ff4b2b";
const IDLE_COLOR: &str = "#666";

/// Static inputs of the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    /// Cards are rendered in this order.
    pub symbols: Vec<Symbol>,
    pub timeframes: Vec<Timeframe>,
    pub trade_url_base: String,
    pub quote_label: String,
    pub refresh_seconds: u32,
    /// The subscribe button is only rendered when push is configured.
    pub vapid_public_key: Option<String>,
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn trend_colors(trend: TrendDirection) -> (&'static str, &'static str) {
    match trend {
        TrendDirection::Up => (UP_COLOR, "rgba(0, 230, 118, 0.12)"),
        TrendDirection::Down => (DOWN_COLOR, "rgba(255, 75, 43, 0.12)"),
    }
}

fn trade_url(base: &str, symbol: &Symbol) -> String {
    format!("{}/{}", base.trim_end_matches('/'), symbol.trade_code())
}

/// Renders the whole page from a snapshot.
pub fn render(snapshot: &MarketSnapshot, view: &DashboardSettings) -> String {
    let mut cards = String::new();
    for symbol in &view.symbols {
        match snapshot.get(symbol) {
            Some(state) => render_card(&mut cards, symbol, state, view),
            None => render_placeholder(&mut cards, symbol, view),
        }
    }

    let (button, script) = match &view.vapid_public_key {
        Some(key) => (
            r#"<button onclick="subscribe()">🔔 Enable notifications</button>"#.to_string(),
            subscribe_script(key),
        ),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stoch RSI Monitor</title>
<meta http-equiv="refresh" content="{refresh}">
<style>{style}</style>
</head>
<body>
<h1>MARKET INTELLIGENCE</h1>
{button}
<div class="container">{cards}</div>
{script}
</body>
</html>"#,
        refresh = view.refresh_seconds,
        style = STYLE,
    )
}

fn render_card(out: &mut String, symbol: &Symbol, state: &SymbolState, view: &DashboardSettings) {
    let oversold = state
        .timeframes
        .values()
        .any(|tf| tf.status == OscillatorStatus::Oversold);
    let price = state
        .price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let (change_color, change_arrow) = if state.percent_change >= 0.0 {
        (UP_COLOR, "▲")
    } else {
        (DOWN_COLOR, "▼")
    };

    let _ = write!(
        out,
        r#"<div class="card{border}">
<div class="symbol-header"><a href="{url}" target="_blank">{name}</a></div>
<div class="price">{price} <small>{quote}</small></div>
<div class="change" style="color: {change_color}">{change_arrow} %{change:.2}</div>
"#,
        border = if oversold { " alert-border" } else { "" },
        url = escape(&trade_url(&view.trade_url_base, symbol)),
        name = escape(&symbol.0),
        price = escape(&price),
        quote = escape(&view.quote_label),
        change = state.percent_change,
    );

    for timeframe in &view.timeframes {
        match state.timeframes.get(timeframe) {
            Some(tf) => render_indicator(out, *timeframe, tf),
            None => render_pending_indicator(out, *timeframe),
        }
    }

    let _ = write!(
        out,
        r#"<div class="footer">Price: {}</div>
</div>"#,
        state.last_update.format("%H:%M:%S UTC")
    );
}

fn render_indicator(out: &mut String, timeframe: Timeframe, tf: &TimeframeState) {
    let (color, background) = trend_colors(tf.trend);
    let _ = write!(
        out,
        r#"<div class="indicator-box" style="background-color: {background}; border: 1px solid {color}44;">
<div class="stoch-label">STOCH RSI ({timeframe}) {arrow}</div>
<div class="value" style="color: {color}">{k:.2}</div>
<div class="status-badge" style="border-color: {color}; color: {color}">{status}</div>
<div class="stoch-time">as of {at}</div>
</div>
"#,
        arrow = tf.trend.arrow(),
        k = tf.current_k,
        status = tf.status.label(),
        at = tf.updated_at.format("%H:%M:%S UTC"),
    );
}

fn render_pending_indicator(out: &mut String, timeframe: Timeframe) {
    let _ = write!(
        out,
        r#"<div class="indicator-box" style="background-color: #1c1c1c;">
<div class="stoch-label">STOCH RSI ({timeframe})</div>
<div class="value" style="color: {IDLE_COLOR}">...</div>
</div>
"#
    );
}

fn render_placeholder(out: &mut String, symbol: &Symbol, view: &DashboardSettings) {
    let _ = write!(
        out,
        r#"<div class="card">
<div class="symbol-header"><a href="{url}" target="_blank">{name}</a></div>
<div class="price">... <small>{quote}</small></div>
<div class="value" style="color: {IDLE_COLOR}">...</div>
<div class="footer">Loading</div>
</div>"#,
        url = escape(&trade_url(&view.trade_url_base, symbol)),
        name = escape(&symbol.0),
        quote = escape(&view.quote_label),
    );
}

fn subscribe_script(vapid_public_key: &str) -> String {
    // The key is embedded in a JS string literal; JSON encoding keeps it inert.
    let key = serde_json::to_string(vapid_public_key).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"<script>
async function subscribe() {{
  const reg = await navigator.serviceWorker.register('/sw.js');
  const sub = await reg.pushManager.subscribe({{ userVisibleOnly: true, applicationServerKey: {key} }});
  await fetch('/subscribe', {{ method: 'POST', body: JSON.stringify(sub), headers: {{ 'content-type': 'application/json' }} }});
  alert('Notifications enabled');
}}
</script>"#
    )
}

const STYLE: &str = "body{font-family:sans-serif;background:#050505;color:white;display:flex;flex-direction:column;align-items:center;padding:20px;}\
.container{display:flex;gap:15px;flex-wrap:wrap;justify-content:center;}\
.card{background:#111;padding:20px;border-radius:20px;border:1px solid #222;width:230px;text-align:center;}\
.alert-border{border:1px solid #ff4b2b;box-shadow:0 0 15px rgba(255,75,43,0.3);}\
.symbol-header a{color:#888;text-decoration:none;border-bottom:1px dashed #444;}\
.indicator-box{padding:15px;border-radius:15px;margin-top:10px;}\
.stoch-label{color:#666;}\
.stoch-time{color:#555;font-size:0.6rem;margin-top:6px;}\
.value{font-size:2.8rem;font-weight:900;}\
.status-badge{font-size:0.6rem;border:1px solid;padding:2px 6px;border-radius:10px;background:rgba(0,0,0,0.3);}\
.footer{margin-top:10px;color:#555;font-size:0.7rem;}\
button{background:#f3ba2f;border:none;padding:10px;border-radius:8px;font-weight:bold;cursor:pointer;margin-bottom:20px;}";
