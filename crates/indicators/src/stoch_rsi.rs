// In crates/indicators/src/stoch_rsi.rs

use crate::rsi::wilder_rsi;
use crate::types::StochRsiSettings;
use crate::{Error, Result};
use core_types::OscillatorPoint;
use ta::Next;
use ta::indicators::{Maximum, Minimum, SimpleMovingAverage as Sma};

/// Raw stochastic value used when the RSI window has no range.
pub const FLAT_WINDOW_VALUE: f64 = 50.0;

/// RSI windows narrower than this are flat. Wilder smoothing over a run of
/// unchanged closes leaves ~1e-14 of rounding noise on the 0-100 scale.
pub const FLAT_WINDOW_TOLERANCE: f64 = 1e-9;

/// Computes the smoothed Stochastic RSI of a close series (oldest first).
///
/// The pipeline is: Wilder RSI over `rsi_period`, the stochastic transform
/// of the RSI over `stochastic_period`, an SMA of `k_period` for %K and an
/// SMA of `d_period` over %K for %D. One point is produced per close past
/// [`StochRsiSettings::warm_up`], so the output has
/// `closes.len() - warm_up` entries.
///
/// # Errors
///
/// * `Error::InvalidPeriod` if any window length is 0.
/// * `Error::InsufficientData` if fewer closes than the warm-up are given.
pub fn stoch_rsi(closes: &[f64], settings: &StochRsiSettings) -> Result<Vec<OscillatorPoint>> {
    settings.validate()?;

    let required = settings.warm_up();
    if closes.len() < required {
        return Err(Error::InsufficientData {
            required,
            actual: closes.len(),
        });
    }

    let mut highest = Maximum::new(settings.stochastic_period)
        .map_err(|_| Error::InvalidPeriod { name: "stochastic_period" })?;
    let mut lowest = Minimum::new(settings.stochastic_period)
        .map_err(|_| Error::InvalidPeriod { name: "stochastic_period" })?;
    let mut k_sma =
        Sma::new(settings.k_period).map_err(|_| Error::InvalidPeriod { name: "k_period" })?;
    let mut d_sma =
        Sma::new(settings.d_period).map_err(|_| Error::InvalidPeriod { name: "d_period" })?;

    // Counters of values fed into each stage; a stage only emits once its
    // window is full.
    let mut rsi_seen = 0;
    let mut stoch_seen = 0;
    let mut k_seen = 0;

    let mut points = Vec::with_capacity(closes.len() - required);

    for rsi in wilder_rsi(closes, settings.rsi_period) {
        let max = highest.next(rsi);
        let min = lowest.next(rsi);
        rsi_seen += 1;
        if rsi_seen < settings.stochastic_period {
            continue;
        }

        let k = k_sma.next(stochastic(rsi, min, max));
        stoch_seen += 1;
        if stoch_seen < settings.k_period {
            continue;
        }

        let d = d_sma.next(k);
        k_seen += 1;
        if k_seen < settings.d_period {
            continue;
        }

        points.push(OscillatorPoint {
            k: k.clamp(0.0, 100.0),
            d: d.clamp(0.0, 100.0),
        });
    }

    Ok(points)
}

/// Returns the `(previous, current)` pair of the two most recent points.
///
/// Fewer than two points are not actionable and yield `None`.
pub fn latest_pair(points: &[OscillatorPoint]) -> Option<(OscillatorPoint, OscillatorPoint)> {
    match points {
        [.., previous, current] => Some((*previous, *current)),
        _ => None,
    }
}

fn stochastic(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range < FLAT_WINDOW_TOLERANCE {
        return FLAT_WINDOW_VALUE;
    }
    (value - min) / range * 100.0
}
