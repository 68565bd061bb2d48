use tracing::{debug, info, warn};

use common::{Direction, Vote};

use crate::config::StrategyParams;
use crate::ensemble::combine;
use crate::indicators::{ema, BollingerBands, FibonacciLevels, RsiIndicator, StochasticOscillator};
use crate::{PriceSeries, SignalRule};

/// Holds the voting rules and runs them over a bar history.
pub struct SignalRegistry {
    rules: Vec<Box<dyn SignalRule>>,
    min_history: usize,
}

impl SignalRegistry {
    /// Build the four standard rules from `params`.
    pub fn from_params(params: &StrategyParams) -> Self {
        let rules: Vec<Box<dyn SignalRule>> = vec![
            Box::new(TrendRule {
                short_period: params.trend.short_period,
                long_period: params.trend.long_period,
            }),
            Box::new(BandRule {
                bands: BollingerBands::new(params.bands.period, params.bands.std_dev),
            }),
            Box::new(OscillatorRule {
                rsi: RsiIndicator::new(
                    params.oscillator.rsi_period,
                    params.oscillator.rsi_overbought,
                    params.oscillator.rsi_oversold,
                ),
                stochastic: StochasticOscillator::new(
                    params.oscillator.stoch_period,
                    params.oscillator.stoch_signal_period,
                ),
                stoch_overbought: params.oscillator.stoch_overbought,
                stoch_oversold: params.oscillator.stoch_oversold,
            }),
            Box::new(RetracementRule {
                levels: FibonacciLevels::new(
                    params.retracement.support_ratio,
                    params.retracement.resistance_ratio,
                ),
            }),
        ];

        for rule in &rules {
            info!(rule = rule.name(), "Registered signal rule");
        }

        Self {
            rules,
            min_history: params.min_history,
        }
    }

    /// Collect every rule's vote. Short histories short-circuit to `[Flat]`.
    pub fn apply(&self, series: &PriceSeries) -> Vec<Vote> {
        if series.len() < self.min_history {
            warn!(
                available = series.len(),
                required = self.min_history,
                "Not enough data to apply strategies"
            );
            return vec![Vote::Flat];
        }

        self.rules
            .iter()
            .filter_map(|rule| {
                let vote = rule.vote(series);
                debug!(rule = rule.name(), vote = ?vote, "Rule evaluated");
                vote
            })
            .collect()
    }

    /// Votes combined into the final forecast.
    pub fn forecast(&self, series: &PriceSeries) -> Direction {
        combine(&self.apply(series))
    }
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self::from_params(&StrategyParams::default())
    }
}

// ─── Concrete rules ───────────────────────────────────────────────────────────

/// Short EMA above long EMA → up, below → down, equal → abstain.
struct TrendRule {
    short_period: usize,
    long_period: usize,
}

impl SignalRule for TrendRule {
    fn name(&self) -> &str {
        "trend"
    }

    fn vote(&self, series: &PriceSeries) -> Option<Vote> {
        let short = ema(&series.close, self.short_period)?;
        let long = ema(&series.close, self.long_period)?;
        if short > long {
            Some(Vote::Up)
        } else if short < long {
            Some(Vote::Down)
        } else {
            None
        }
    }
}

/// Last close outside the Bollinger bands follows the breakout.
struct BandRule {
    bands: BollingerBands,
}

impl SignalRule for BandRule {
    fn name(&self) -> &str {
        "bollinger"
    }

    fn vote(&self, series: &PriceSeries) -> Option<Vote> {
        let (Some(bands), Some(last)) = (self.bands.compute(&series.close), series.last_close())
        else {
            return Some(Vote::Flat);
        };
        if last > bands.upper {
            Some(Vote::Up)
        } else if last < bands.lower {
            Some(Vote::Down)
        } else {
            Some(Vote::Flat)
        }
    }
}

/// RSI and stochastic extremes, read as mean reversion.
struct OscillatorRule {
    rsi: RsiIndicator,
    stochastic: StochasticOscillator,
    stoch_overbought: f64,
    stoch_oversold: f64,
}

impl SignalRule for OscillatorRule {
    fn name(&self) -> &str {
        "oscillator"
    }

    fn vote(&self, series: &PriceSeries) -> Option<Vote> {
        let rsi = self.rsi.compute(&series.close);
        let stoch = self
            .stochastic
            .compute(&series.high, &series.low, &series.close);

        // Missing values compare false.
        let k = stoch.map(|s| s.k);
        let d = stoch.and_then(|s| s.d);
        let k_below_d = matches!((k, d), (Some(k), Some(d)) if k < d);
        let k_above_d = matches!((k, d), (Some(k), Some(d)) if k > d);

        let overbought = rsi.is_some_and(|v| self.rsi.is_overbought(v))
            || (k.is_some_and(|k| k > self.stoch_overbought) && k_below_d);
        let oversold = rsi.is_some_and(|v| self.rsi.is_oversold(v))
            || (k.is_some_and(|k| k < self.stoch_oversold) && k_above_d);

        if overbought {
            Some(Vote::Down)
        } else if oversold {
            Some(Vote::Up)
        } else {
            None
        }
    }
}

/// Last close against the 38.2% / 61.8% retracement of the global range.
struct RetracementRule {
    levels: FibonacciLevels,
}

impl SignalRule for RetracementRule {
    fn name(&self) -> &str {
        "fibonacci"
    }

    fn vote(&self, series: &PriceSeries) -> Option<Vote> {
        let levels = self.levels.compute(&series.high, &series.low)?;
        let last = series.last_close()?;
        if last > levels.resistance {
            Some(Vote::Up)
        } else if last < levels.support {
            Some(Vote::Down)
        } else {
            Some(Vote::Flat)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_from_closes(close: Vec<f64>) -> PriceSeries {
        PriceSeries {
            high: close.clone(),
            low: close.clone(),
            close,
        }
    }

    fn rising(n: usize) -> PriceSeries {
        series_from_closes((0..n).map(|i| 1.05 + i as f64 * 0.0001).collect())
    }

    fn falling(n: usize) -> PriceSeries {
        series_from_closes((0..n).map(|i| 1.10 - i as f64 * 0.0001).collect())
    }

    #[test]
    fn short_history_is_single_flat_vote() {
        let registry = SignalRegistry::default();
        assert_eq!(registry.apply(&rising(199)), vec![Vote::Flat]);
        assert_eq!(registry.apply(&PriceSeries::default()), vec![Vote::Flat]);
        assert_eq!(registry.forecast(&falling(10)), Direction::Flat);
    }

    #[test]
    fn rising_series_votes() {
        // Linear rise: trend up, inside the bands, RSI pinned at 100, above resistance.
        let votes = SignalRegistry::default().apply(&rising(250));
        assert_eq!(votes, vec![Vote::Up, Vote::Flat, Vote::Down, Vote::Up]);
        assert_eq!(combine(&votes), Direction::Up);
    }

    #[test]
    fn falling_series_forecasts_down() {
        let votes = SignalRegistry::default().apply(&falling(250));
        assert_eq!(votes, vec![Vote::Down, Vote::Flat, Vote::Up, Vote::Down]);
        assert_eq!(SignalRegistry::default().forecast(&falling(250)), Direction::Down);
    }

    #[test]
    fn trend_abstains_when_averages_match() {
        let rule = TrendRule { short_period: 5, long_period: 5 };
        assert_eq!(rule.vote(&rising(30)), None);
        let rule = TrendRule { short_period: 5, long_period: 50 };
        assert_eq!(rule.vote(&rising(30)), None);
    }

    #[test]
    fn retracement_rule_matches_reference_levels() {
        let rule = RetracementRule { levels: FibonacciLevels::default() };
        let at = |close: f64| PriceSeries {
            high: vec![110.0],
            low: vec![100.0],
            close: vec![close],
        };
        assert_eq!(rule.vote(&at(107.0)), Some(Vote::Up));
        assert_eq!(rule.vote(&at(103.0)), Some(Vote::Down));
        assert_eq!(rule.vote(&at(105.0)), Some(Vote::Flat));
    }

    #[test]
    fn band_breakout_votes_with_the_move() {
        let rule = BandRule { bands: BollingerBands::new(20, 2.0) };
        let mut closes = vec![1.08; 25];
        closes.push(1.09);
        assert_eq!(rule.vote(&series_from_closes(closes.clone())), Some(Vote::Up));
        closes.pop();
        closes.push(1.07);
        assert_eq!(rule.vote(&series_from_closes(closes)), Some(Vote::Down));
        assert_eq!(rule.vote(&series_from_closes(vec![1.08; 5])), Some(Vote::Flat));
    }

    #[test]
    fn oscillator_stochastic_branch() {
        let rule = OscillatorRule {
            rsi: RsiIndicator::new(14, 70.0, 30.0),
            stochastic: StochasticOscillator::new(3, 3),
            stoch_overbought: 80.0,
            stoch_oversold: 20.0,
        };
        // Too short for RSI; %K 90 under %D 95 reads as overbought.
        let series = PriceSeries {
            high: vec![10.0; 5],
            low: vec![0.0; 5],
            close: vec![0.0, 10.0, 10.0, 9.5, 9.0],
        };
        // %K values: 100, 95, 90 → %D 95
        assert_eq!(rule.vote(&series), Some(Vote::Down));

        let series = PriceSeries {
            high: vec![10.0; 5],
            low: vec![0.0; 5],
            close: vec![10.0, 0.0, 0.0, 0.5, 1.0],
        };
        // %K values: 0, 5, 10 → %D 5
        assert_eq!(rule.vote(&series), Some(Vote::Up));

        let series = PriceSeries {
            high: vec![10.0; 5],
            low: vec![0.0; 5],
            close: vec![5.0; 5],
        };
        assert_eq!(rule.vote(&series), None);
    }
}
