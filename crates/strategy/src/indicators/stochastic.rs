/// Stochastic oscillator (%K, %D).
///
/// %K = 100 · (close − lowest low) / (highest high − lowest low) over the last
/// `period` bars, 0 when the range is empty. %D is the SMA of the last
/// `signal_period` %K values.
#[derive(Debug, Clone)]
pub struct StochasticOscillator {
    pub period: usize,
    pub signal_period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    /// `None` until `signal_period` %K values exist.
    pub d: Option<f64>,
}

impl StochasticOscillator {
    pub fn new(period: usize, signal_period: usize) -> Self {
        assert!(period >= 1 && signal_period >= 1, "Stochastic periods must be >= 1");
        Self { period, signal_period }
    }

    /// Latest %K/%D. `None` if the series are shorter than `period` or their
    /// lengths disagree.
    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Option<StochasticValue> {
        let n = close.len();
        if high.len() != n || low.len() != n || n < self.period {
            return None;
        }

        let k_at = |end: usize| {
            let start = end + 1 - self.period;
            let highest = high[start..=end].iter().copied().fold(f64::MIN, f64::max);
            let lowest = low[start..=end].iter().copied().fold(f64::MAX, f64::min);
            let k = (close[end] - lowest) / (highest - lowest) * 100.0;
            if k.is_nan() { 0.0 } else { k }
        };

        let available = n - self.period + 1;
        let recent: Vec<f64> = (n - available.min(self.signal_period)..n).map(k_at).collect();
        let k = *recent.last()?;
        let d = (recent.len() == self.signal_period).then(|| super::sma(&recent));

        Some(StochasticValue { k, d })
    }
}
