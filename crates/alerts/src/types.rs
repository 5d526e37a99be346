// In crates/alerts/src/types.rs

use crate::{Error, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// How the cooldown book keys its entries.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CooldownScope {
    /// One cooldown per symbol, shared by all timeframes.
    #[default]
    Symbol,
    /// An independent cooldown per (symbol, timeframe).
    SymbolTimeframe,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlertSettings {
    #[serde(default = "default_oversold")]
    pub oversold_threshold: f64,
    #[serde(default = "default_overbought")]
    pub overbought_threshold: f64,
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    #[serde(default)]
    pub cooldown_scope: CooldownScope,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            oversold_threshold: default_oversold(),
            overbought_threshold: default_overbought(),
            cooldown_minutes: default_cooldown_minutes(),
            cooldown_scope: CooldownScope::default(),
        }
    }
}

impl AlertSettings {
    pub fn cooldown(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.cooldown_minutes))
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.oversold_threshold)
            || !in_range(self.overbought_threshold)
            || self.oversold_threshold >= self.overbought_threshold
        {
            return Err(Error::InvalidThresholds {
                oversold: self.oversold_threshold,
                overbought: self.overbought_threshold,
            });
        }
        Ok(())
    }
}

// Helper functions for serde defaults.
fn default_oversold() -> f64 { 15.0 }
fn default_overbought() -> f64 { 85.0 }
fn default_cooldown_minutes() -> u32 { 30 }
