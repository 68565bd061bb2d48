/// Bollinger Bands: SMA of the last `period` closes ± `multiplier` population
/// standard deviations of the same window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub period: usize,
    pub multiplier: f64,
}

/// Band values for the most recent window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

impl BollingerBands {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self { period, multiplier }
    }

    /// Bands over the last `period` closes. `None` with fewer closes.
    pub fn compute(&self, closes: &[f64]) -> Option<Bands> {
        if closes.len() < self.period {
            return None;
        }
        let window = &closes[closes.len() - self.period..];
        let middle = super::sma(window);
        let variance =
            window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / self.period as f64;
        let width = self.multiplier * variance.sqrt();

        Some(Bands {
            lower: middle - width,
            middle,
            upper: middle + width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn none_when_window_incomplete() {
        assert!(BollingerBands::new(20, 2.0).compute(&[1.0; 19]).is_none());
    }

    #[test]
    fn constant_series_collapses_bands() {
        let bands = BollingerBands::new(20, 2.0).compute(&[1.0845; 30]).unwrap();
        assert_relative_eq!(bands.lower, 1.0845, epsilon = 1e-12);
        assert_relative_eq!(bands.upper, 1.0845, epsilon = 1e-12);
    }

    #[test]
    fn uses_population_deviation_of_latest_window() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population σ 2.
        let mut closes = vec![100.0; 5];
        closes.extend([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let bands = BollingerBands::new(8, 2.0).compute(&closes).unwrap();
        assert_relative_eq!(bands.middle, 5.0, epsilon = 1e-12);
        assert_relative_eq!(bands.upper, 9.0, epsilon = 1e-12);
        assert_relative_eq!(bands.lower, 1.0, epsilon = 1e-12);
    }
}
