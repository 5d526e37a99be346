// In crates/notifier/src/messages.rs

use crate::types::PushPayload;
use core_types::{Symbol, Timeframe};

pub fn push_payload(symbol: &Symbol, current_k: f64, timeframe: Timeframe) -> PushPayload {
    PushPayload {
        title: format!("🚨 {} SIGNAL!", symbol),
        body: format!("Stoch RSI: {:.2} ({}) in oversold zone", current_k, timeframe),
    }
}

pub fn email_subject(symbol: &Symbol) -> String {
    format!("🚨 {} is oversold", symbol)
}

pub fn email_body(symbol: &Symbol, current_k: f64, price: Option<f64>, timeframe: Timeframe) -> String {
    let quote = symbol.split_pair().map(|(_, quote)| quote).unwrap_or("");
    let price = match price {
        Some(p) => format!("{} {}", p, quote),
        None => "N/A".to_string(),
    };
    format!(
        "{} is currently at {}. Stoch RSI ({}) is {:.2}, in the oversold zone.",
        symbol, price, timeframe, current_k
    )
}
