/// Exponential Moving Average over the full series, returning the latest value.
///
/// Seeded with the SMA of the first `period` values, then smoothed with
/// `k = 2 / (period + 1)` across every remaining price.
/// Returns `None` if `values.len() < period` or `period == 0`.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = super::sma(&values[..period]);

    Some(
        values[period..]
            .iter()
            .fold(seed, |prev, &price| price * k + prev * (1.0 - k)),
    )
}
