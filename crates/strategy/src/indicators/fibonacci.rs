/// Fibonacci retracement levels over the global high/low of a series.
#[derive(Debug, Clone)]
pub struct FibonacciLevels {
    pub support_ratio: f64,
    pub resistance_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetracementLevels {
    pub support: f64,
    pub resistance: f64,
}

impl Default for FibonacciLevels {
    fn default() -> Self {
        Self::new(0.382, 0.618)
    }
}

impl FibonacciLevels {
    pub fn new(support_ratio: f64, resistance_ratio: f64) -> Self {
        Self { support_ratio, resistance_ratio }
    }

    /// Levels measured up from `min(low)` across `max(high) - min(low)`.
    /// `None` when either series is empty.
    pub fn compute(&self, high: &[f64], low: &[f64]) -> Option<RetracementLevels> {
        if high.is_empty() || low.is_empty() {
            return None;
        }
        let top = high.iter().copied().fold(f64::MIN, f64::max);
        let bottom = low.iter().copied().fold(f64::MAX, f64::min);
        let range = top - bottom;

        Some(RetracementLevels {
            support: bottom + range * self.support_ratio,
            resistance: bottom + range * self.resistance_ratio,
        })
    }
}
