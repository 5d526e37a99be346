// In crates/alerts/src/state.rs

use crate::types::AlertSettings;
use chrono::{DateTime, Utc};
use core_types::{OscillatorPoint, OscillatorStatus, TimeframeState, TrendDirection};

/// `Up` when %K did not fall since the previous reading.
pub fn trend_direction(current_k: f64, previous_k: f64) -> TrendDirection {
    if current_k >= previous_k {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    }
}

pub fn classify(current_k: f64, oversold: f64, overbought: f64) -> OscillatorStatus {
    if current_k < oversold {
        OscillatorStatus::Oversold
    } else if current_k > overbought {
        OscillatorStatus::Overbought
    } else {
        OscillatorStatus::Normal
    }
}

/// Builds the display state of a timeframe from its two latest points,
/// stamped with the time the candles were fetched.
pub fn derive_timeframe_state(
    previous: OscillatorPoint,
    current: OscillatorPoint,
    settings: &AlertSettings,
    now: DateTime<Utc>,
) -> TimeframeState {
    TimeframeState {
        current_k: current.k,
        current_d: current.d,
        trend: trend_direction(current.k, previous.k),
        status: classify(current.k, settings.oversold_threshold, settings.overbought_threshold),
        updated_at: now,
    }
}
