/// RSI (Relative Strength Index) indicator.
///
/// Wilder smoothing seeded by the plain average gain/loss of the first
/// `period` changes. Returns `None` until at least `period + 1` closes exist.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl RsiIndicator {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        assert!(period >= 2, "RSI period must be >= 2");
        Self { period, overbought, oversold }
    }

    /// Latest RSI value for `closes` (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period + 1 {
            return None;
        }

        let n = self.period as f64;
        let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let (seed, rest) = changes.split_at(self.period);

        let seed_gain = seed.iter().map(|c| c.max(0.0)).sum::<f64>() / n;
        let seed_loss = seed.iter().map(|c| (-c).max(0.0)).sum::<f64>() / n;

        let (avg_gain, avg_loss) = rest.iter().fold((seed_gain, seed_loss), |(g, l), &c| {
            (
                (g * (n - 1.0) + c.max(0.0)) / n,
                (l * (n - 1.0) + (-c).max(0.0)) / n,
            )
        });

        if avg_loss == 0.0 {
            return Some(100.0);
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }

    pub fn is_overbought(&self, value: f64) -> bool {
        value > self.overbought
    }

    pub fn is_oversold(&self, value: f64) -> bool {
        value < self.oversold
    }
}
