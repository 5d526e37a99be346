// In crates/indicators/src/rsi.rs

/// Relative Strength Index with Wilder's smoothing.
///
/// The first average gain/loss is the simple mean of the first `period`
/// price changes; later values use `avg = (prev * (period - 1) + x) / period`.
/// Returns `closes.len() - period` values (empty when there is not enough
/// data), the first one aligned with `closes[period]`.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let mut avg_gain = changes[..period].iter().map(|c| c.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = changes[..period].iter().map(|c| (-c).max(0.0)).sum::<f64>() / p;

    let mut rsi = Vec::with_capacity(closes.len() - period);
    rsi.push(rsi_value(avg_gain, avg_loss));

    for change in &changes[period..] {
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        rsi.push(rsi_value(avg_gain, avg_loss));
    }

    rsi
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        // No losses: pure uptrend, or no movement at all.
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
