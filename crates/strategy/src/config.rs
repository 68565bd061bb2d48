use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Indicator periods and thresholds for the voting strategy.
///
/// Every field has a default, so the file is optional and may override any
/// subset. Example `config/strategy.toml`:
/// ```toml
/// min_history = 200
///
/// [trend]
/// short_period = 50
/// long_period = 200
///
/// [oscillator]
/// rsi_overbought = 70.0
/// rsi_oversold = 30.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Closes required before any rule runs; below this the vote is `[Flat]`.
    pub min_history: usize,
    pub trend: TrendParams,
    pub bands: BandParams,
    pub oscillator: OscillatorParams,
    pub retracement: RetracementParams,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendParams {
    pub short_period: usize,
    pub long_period: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BandParams {
    pub period: usize,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OscillatorParams {
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub stoch_period: usize,
    pub stoch_signal_period: usize,
    pub stoch_overbought: f64,
    pub stoch_oversold: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetracementParams {
    pub support_ratio: f64,
    pub resistance_ratio: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            min_history: 200,
            trend: TrendParams::default(),
            bands: BandParams::default(),
            oscillator: OscillatorParams::default(),
            retracement: RetracementParams::default(),
        }
    }
}

impl Default for TrendParams {
    fn default() -> Self {
        Self { short_period: 50, long_period: 200 }
    }
}

impl Default for BandParams {
    fn default() -> Self {
        Self { period: 20, std_dev: 2.0 }
    }
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            stoch_period: 14,
            stoch_signal_period: 3,
            stoch_overbought: 80.0,
            stoch_oversold: 20.0,
        }
    }
}

impl Default for RetracementParams {
    fn default() -> Self {
        Self { support_ratio: 0.382, resistance_ratio: 0.618 }
    }
}

impl StrategyParams {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("strategy params at '{path}': {e}")))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let params: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.trend.short_period == 0 || self.trend.short_period >= self.trend.long_period {
            return Err(Error::Config(
                "trend.short_period must be non-zero and below trend.long_period".into(),
            ));
        }
        if self.min_history < self.trend.long_period {
            return Err(Error::Config(
                "min_history must be at least trend.long_period".into(),
            ));
        }
        if self.bands.period == 0 {
            return Err(Error::Config("bands.period must be non-zero".into()));
        }
        if !self.bands.std_dev.is_finite() || self.bands.std_dev <= 0.0 {
            return Err(Error::Config("bands.std_dev must be finite and positive".into()));
        }
        if self.oscillator.rsi_period < 2 {
            return Err(Error::Config("oscillator.rsi_period must be >= 2".into()));
        }
        if self.oscillator.stoch_period == 0 || self.oscillator.stoch_signal_period == 0 {
            return Err(Error::Config("stochastic periods must be non-zero".into()));
        }
        let (support_ratio, resistance_ratio) =
            (self.retracement.support_ratio, self.retracement.resistance_ratio);
        if !(0.0..=1.0).contains(&support_ratio)
            || !(0.0..=1.0).contains(&resistance_ratio)
            || support_ratio >= resistance_ratio
        {
            return Err(Error::Config(
                "retracement ratios must satisfy 0 <= support_ratio < resistance_ratio <= 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(StrategyParams::from_toml("").unwrap(), StrategyParams::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let params = StrategyParams::from_toml(
            r#"
            min_history = 250

            [oscillator]
            rsi_overbought = 75.0
            "#,
        )
        .unwrap();
        assert_eq!(params.min_history, 250);
        assert_eq!(params.oscillator.rsi_overbought, 75.0);
        assert_eq!(params.oscillator.rsi_oversold, 30.0);
        assert_eq!(params.trend, TrendParams::default());
    }

    #[test]
    fn rejects_inverted_trend_periods() {
        let err = StrategyParams::from_toml("[trend]\nshort_period = 200\nlong_period = 50\n");
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn rejects_bad_band_width() {
        for std_dev in ["-1.0", "0.0", "nan", "inf"] {
            let toml = format!("[bands]\nstd_dev = {std_dev}\n");
            assert!(
                matches!(StrategyParams::from_toml(&toml), Err(Error::Config(_))),
                "accepted std_dev = {std_dev}"
            );
        }
    }

    #[test]
    fn rejects_history_gate_below_long_trend() {
        let err = StrategyParams::from_toml("min_history = 150\n");
        assert!(matches!(err, Err(Error::Config(_))));
        let ok = StrategyParams::from_toml("min_history = 150\n[trend]\nlong_period = 150\n");
        assert!(ok.is_ok());
    }

    #[test]
    fn rejects_inverted_retracement_ratios() {
        let inverted = "[retracement]\nsupport_ratio = 0.618\nresistance_ratio = 0.382\n";
        assert!(matches!(StrategyParams::from_toml(inverted), Err(Error::Config(_))));
        let out_of_range = "[retracement]\nresistance_ratio = 1.5\n";
        assert!(matches!(StrategyParams::from_toml(out_of_range), Err(Error::Config(_))));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = include_str!("../../../config/strategy.toml");
        assert_eq!(StrategyParams::from_toml(shipped).unwrap(), StrategyParams::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StrategyParams::load("/nonexistent/strategy.toml");
        assert!(matches!(err, Err(Error::Io(_))));
    }
}
