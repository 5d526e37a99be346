// In crates/indicators/src/types.rs

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Window lengths for the Stochastic RSI pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StochRsiSettings {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_stochastic_period")]
    pub stochastic_period: usize,
    #[serde(default = "default_smoothing")]
    pub k_period: usize,
    #[serde(default = "default_smoothing")]
    pub d_period: usize,
}

impl Default for StochRsiSettings {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            stochastic_period: default_stochastic_period(),
            k_period: default_smoothing(),
            d_period: default_smoothing(),
        }
    }
}

impl StochRsiSettings {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("stochastic_period", self.stochastic_period),
            ("k_period", self.k_period),
            ("d_period", self.d_period),
        ];
        match periods.iter().find(|(_, p)| *p == 0) {
            Some((name, _)) => Err(Error::InvalidPeriod { name }),
            None => Ok(()),
        }
    }

    /// Number of leading closes consumed before the first %D value exists.
    ///
    /// RSI needs `rsi_period + 1` closes for its first value, and each later
    /// window of length `n` needs `n - 1` additional values.
    pub fn warm_up(&self) -> usize {
        self.rsi_period
            + self.stochastic_period.saturating_sub(1)
            + self.k_period.saturating_sub(1)
            + self.d_period.saturating_sub(1)
    }
}

// Helper functions for serde defaults.
fn default_rsi_period() -> usize { 14 }
fn default_stochastic_period() -> usize { 14 }
fn default_smoothing() -> usize { 3 }
