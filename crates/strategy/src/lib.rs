pub mod config;
pub mod ensemble;
pub mod indicators;
pub mod registry;

pub use config::StrategyParams;
pub use ensemble::combine;
pub use registry::SignalRegistry;

use common::{Bar, Vote};

/// High/low/close columns of a bar history, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl PriceSeries {
    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.close.last().copied()
    }
}

/// One technical rule in the voting ensemble.
pub trait SignalRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Evaluate the full history. `None` means the rule abstains.
    fn vote(&self, series: &PriceSeries) -> Option<Vote>;
}
