// In crates/alerts/src/policy.rs

use crate::types::{AlertSettings, CooldownScope};
use chrono::{DateTime, TimeDelta, Utc};
use core_types::{Symbol, Timeframe};
use std::collections::HashMap;

/// Decides whether an oversold reading should produce a new alert.
///
/// Fires when `current_k` is strictly below `oversold_threshold` and either
/// no alert was recorded yet or strictly more than `cooldown` has elapsed
/// since the last one.
pub fn should_alert(
    current_k: f64,
    last_fired_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: TimeDelta,
    oversold_threshold: f64,
) -> bool {
    if current_k.is_nan() || current_k >= oversold_threshold {
        return false;
    }
    match last_fired_at {
        None => true,
        Some(last) => now - last > cooldown,
    }
}

/// The key a cooldown entry is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKey {
    Symbol(Symbol),
    SymbolTimeframe(Symbol, Timeframe),
}

impl AlertKey {
    pub fn new(scope: CooldownScope, symbol: &Symbol, timeframe: Timeframe) -> Self {
        match scope {
            CooldownScope::Symbol => AlertKey::Symbol(symbol.clone()),
            CooldownScope::SymbolTimeframe => AlertKey::SymbolTimeframe(symbol.clone(), timeframe),
        }
    }
}

/// Last-fired timestamps. Entries are only ever overwritten, never expired.
#[derive(Debug, Clone, Default)]
pub struct CooldownBook {
    last_fired: HashMap<AlertKey, DateTime<Utc>>,
}

impl CooldownBook {
    pub fn last_fired(&self, key: &AlertKey) -> Option<DateTime<Utc>> {
        self.last_fired.get(key).copied()
    }

    pub fn record(&mut self, key: AlertKey, at: DateTime<Utc>) {
        self.last_fired.insert(key, at);
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

/// Oversold alert policy with a per-key cooldown.
///
/// The policy owns its [`CooldownBook`]; the poll loop is its only user,
/// so deciding and recording happen in one `&mut self` call.
#[derive(Debug)]
pub struct AlertPolicy {
    settings: AlertSettings,
    book: CooldownBook,
}

impl AlertPolicy {
    pub fn new(settings: AlertSettings) -> Self {
        Self {
            settings,
            book: CooldownBook::default(),
        }
    }

    pub fn settings(&self) -> &AlertSettings {
        &self.settings
    }

    pub fn book(&self) -> &CooldownBook {
        &self.book
    }

    /// Read-only check against the current cooldown book.
    pub fn should_alert(&self, symbol: &Symbol, timeframe: Timeframe, current_k: f64, now: DateTime<Utc>) -> bool {
        let key = AlertKey::new(self.settings.cooldown_scope, symbol, timeframe);
        should_alert(
            current_k,
            self.book.last_fired(&key),
            now,
            self.settings.cooldown(),
            self.settings.oversold_threshold,
        )
    }

    /// Decides whether to fire and, if so, records `now` for the key.
    pub fn evaluate(&mut self, symbol: &Symbol, timeframe: Timeframe, current_k: f64, now: DateTime<Utc>) -> bool {
        if !self.should_alert(symbol, timeframe, current_k, now) {
            return false;
        }
        let key = AlertKey::new(self.settings.cooldown_scope, symbol, timeframe);
        tracing::debug!(symbol = %symbol, timeframe = %timeframe, current_k, "Recording alert in cooldown book.");
        self.book.record(key, now);
        true
    }
}
