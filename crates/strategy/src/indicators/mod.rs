pub mod bollinger;
pub mod ema;
pub mod fibonacci;
pub mod rsi;
pub mod stochastic;

pub use bollinger::{BollingerBands, Bands};
pub use ema::ema;
pub use fibonacci::{FibonacciLevels, RetracementLevels};
pub use rsi::RsiIndicator;
pub use stochastic::{StochasticOscillator, StochasticValue};

/// Simple moving average of the last `period` values.
pub(crate) fn sma(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
