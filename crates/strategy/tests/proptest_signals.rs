use proptest::prelude::*;

use common::{Direction, Vote};
use strategy::{combine, PriceSeries, SignalRegistry};

fn series_strategy(len: std::ops::Range<usize>) -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec((0.5f64..2.0f64, 0.0f64..0.01f64, 0.0f64..1.0f64), len).prop_map(
        |rows| {
            let mut series = PriceSeries::default();
            for (mid, spread, pos) in rows {
                let low = mid - spread;
                let high = mid + spread;
                series.high.push(high);
                series.low.push(low);
                series.close.push(low + (high - low) * pos);
            }
            series
        },
    )
}

proptest! {
    /// Anything shorter than the history gate is exactly one flat vote.
    #[test]
    fn short_history_always_flat(series in series_strategy(0..200)) {
        let votes = SignalRegistry::default().apply(&series);
        prop_assert_eq!(votes, vec![Vote::Flat]);
    }

    /// Full-length random walks never panic and cast at most one vote per rule.
    #[test]
    fn long_history_never_panics(series in series_strategy(200..400)) {
        let registry = SignalRegistry::default();
        let votes = registry.apply(&series);
        prop_assert!(votes.len() <= 4);
        prop_assert!(votes.len() >= 2, "band and retracement always vote: {:?}", votes);
        let _ = registry.forecast(&series);
    }

    /// A strict winner is never overruled.
    #[test]
    fn combine_respects_strict_majority(up in 0usize..5, down in 0usize..5, flat in 0usize..5) {
        let mut votes = vec![Vote::Up; up];
        votes.extend(vec![Vote::Down; down]);
        votes.extend(vec![Vote::Flat; flat]);
        let expected = if up > down && up > flat {
            Direction::Up
        } else if down > up && down > flat {
            Direction::Down
        } else {
            Direction::Flat
        };
        prop_assert_eq!(combine(&votes), expected);
    }
}
