//! Lagged percentage-change math.
//!
//! Lags are positional: `lag = 12` compares against the 12th previous
//! *recorded* observation of the same series, not the same calendar month one
//! year earlier. A series with a missing month therefore compares across the
//! gap instead of producing a null.

use crate::domain::OUTLIER_THRESHOLD_PCT;

/// `(current / previous - 1) * 100`, or `None` when the result is not finite.
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    let rate = (current / previous - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

/// Drop rates strictly above the threshold in magnitude; exactly 500 is kept.
pub fn suppress_outlier(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.abs() <= OUTLIER_THRESHOLD_PCT)
}

/// Positional lagged rates for one series' index values.
///
/// `out[i]` is defined when `i >= lag`; outliers are already suppressed.
pub fn lagged_rates(values: &[f64], lag: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let rate = i
                .checked_sub(lag)
                .filter(|_| lag > 0)
                .and_then(|j| pct_change(values[i], values[j]));
            suppress_outlier(rate)
        })
        .collect()
}
