//! Behavioural properties of the reconstruction engine.
//!
//! Tests cover:
//! - Worked examples for Renko and range bars
//! - Reversal cost for Renko bricks
//! - Non-emptiness, chronology and fixed bar height over random walks
//! - Independent reconstruction from parallel workers

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use wrbars::{
    adaptive_brick_size, apply_chain, range_bars, renko_bricks, to_range_bars, to_renko, Bar,
    BarTransform, BrickSizing, RangeBarConfig, RangeBarTransform, RenkoTransform, TieBreak,
};

const TOL: f64 = 1e-9;

mod examples {
    use super::*;

    #[test]
    fn renko_worked_example() {
        let series = series_from_closes(&[100.0, 100.0, 103.0, 101.0, 107.0]);
        let bricks = to_renko(&series, BrickSizing::Fixed(2.0)).unwrap().to_bars();

        assert_eq!(bricks.len(), 3);
        let expected = [(100.0, 102.0), (102.0, 104.0), (104.0, 106.0)];
        for (brick, (open, close)) in bricks.iter().zip(expected) {
            assert_relative_eq!(brick.open, open);
            assert_relative_eq!(brick.close, close);
            assert_relative_eq!(brick.height(), 2.0);
        }
    }

    #[test]
    fn range_bar_worked_example() {
        let bars = range_bars(&[0, 1, 2], &[10.0, 10.0, 13.0], &[9.0, 9.0, 9.0], &RangeBarConfig::new(3.0))
            .unwrap();
        assert_eq!(bars[0], Bar::new(0, 9.5, 13.0, 10.0, 13.0));
    }

    #[test]
    fn renko_from_volatility_sized_bricks() {
        let closes = walk(100.0, &[1.0, -0.5, 2.0, 1.5, -3.0, 2.5, 1.0, 1.0, -0.5, 2.0, 3.0, -1.0, 0.5, 2.0, 1.0, 1.0]);
        let series = series_from_closes(&closes);
        let size = adaptive_brick_size(series.high(), series.low(), series.close(), 5).unwrap();
        assert!(size > 1.0);

        let bricks = to_renko(&series, BrickSizing::Adaptive { period: 5 }).unwrap().to_bars();
        assert!(!bricks.is_empty());
        if bricks.len() > 1 {
            for b in &bricks {
                assert_relative_eq!((b.close - b.open).abs(), size, epsilon = TOL);
            }
        }
    }
}

mod reversal {
    use super::*;

    #[test]
    fn two_brick_drop_after_rise_yields_one_brick() {
        for k in 1..6 {
            let mut closes: Vec<f64> = (0..=k).map(|i| 100.0 + 2.0 * i as f64).collect();
            let top = *closes.last().unwrap();
            closes.push(top - 4.0);

            let bricks = renko_bricks(&(0..closes.len() as i64).collect::<Vec<_>>(), &closes, 2.0).unwrap();
            assert_eq!(bricks.len(), k + 1, "k = {k}");
            let last = bricks.last().unwrap();
            assert_relative_eq!(last.open, top);
            assert_relative_eq!(last.close, top - 2.0);
        }
    }

    #[test]
    fn one_brick_drop_after_rise_yields_nothing() {
        let closes = [100.0, 102.0, 104.0, 102.0];
        let bricks = renko_bricks(&[0, 1, 2, 3], &closes, 2.0).unwrap();
        assert_eq!(bricks.len(), 2);
        assert!(bricks.iter().all(|b| b.is_bullish()));
    }
}

mod chaining {
    use super::*;

    #[test]
    fn renko_of_range_bars() {
        let closes = walk(50.0, &[0.7, 0.9, -1.2, 2.4, 0.3, -0.8, 1.9, 1.1, -2.5, 0.4]);
        let series = series_from_closes(&closes);
        let range = RangeBarTransform {
            config: RangeBarConfig::new(1.0),
        };
        let renko = RenkoTransform {
            sizing: BrickSizing::Fixed(1.0),
        };
        let out = apply_chain(&series, &[&range, &renko]).unwrap();
        let manual = renko.apply(&range.apply(&series).unwrap()).unwrap();
        assert_eq!(out, manual);
    }
}

#[test]
fn parallel_workers_are_independent() {
    let inputs: Vec<Vec<f64>> = (0..8)
        .map(|seed| (0..200).map(|i| 100.0 + ((i * (seed + 3)) % 17) as f64 - 8.0).collect())
        .collect();

    let sequential: Vec<_> = inputs
        .iter()
        .map(|c| to_renko(&series_from_closes(c), BrickSizing::Fixed(1.5)).unwrap())
        .collect();

    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|c| s.spawn(move || to_renko(&series_from_closes(c), BrickSizing::Fixed(1.5)).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}

fn steps() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-5.0..5.0f64, 0..150)
}

proptest! {
    #[test]
    fn renko_is_nonempty_ordered_and_fixed_height(steps in steps(), brick in 0.25..5.0f64) {
        let closes = walk(100.0, &steps);
        let time: Vec<i64> = (0..closes.len() as i64).collect();
        let bricks = renko_bricks(&time, &closes, brick).unwrap();

        prop_assert!(!bricks.is_empty());
        prop_assert!(bricks.windows(2).all(|w| w[0].time <= w[1].time));
        prop_assert!(bricks.iter().all(|b| time.contains(&b.time)));

        // a real brick can never complete on the first close
        let synthetic = bricks[0].time == 0;
        if synthetic {
            prop_assert_eq!(bricks.len(), 1);
            prop_assert_eq!(bricks[0].open, closes[0]);
            prop_assert_eq!(bricks[0].close, closes[closes.len() - 1]);
        } else {
            for b in &bricks {
                prop_assert!(((b.close - b.open).abs() - brick).abs() < TOL);
                prop_assert!((b.height() - brick).abs() < TOL);
            }
        }
    }

    #[test]
    fn renko_bricks_chain_end_to_end(steps in steps(), brick in 0.25..5.0f64) {
        let closes = walk(100.0, &steps);
        let time: Vec<i64> = (0..closes.len() as i64).collect();
        let bricks = renko_bricks(&time, &closes, brick).unwrap();
        if bricks.len() > 1 {
            for w in bricks.windows(2) {
                prop_assert!((w[1].open - w[0].close).abs() < TOL);
            }
        }
    }

    #[test]
    fn range_bars_are_nonempty_ordered_and_fixed_height(
        steps in steps(),
        spreads in proptest::collection::vec((0.0..2.0f64, 0.0..2.0f64), 151),
        range in 0.25..5.0f64,
        low_tie in any::<bool>(),
    ) {
        let closes = walk(100.0, &steps);
        let time: Vec<i64> = (0..closes.len() as i64).collect();
        let high: Vec<f64> = closes.iter().zip(&spreads).map(|(c, (up, _))| c + up).collect();
        let low: Vec<f64> = closes.iter().zip(&spreads).map(|(c, (_, down))| c - down).collect();
        let tie_break = if low_tie { TieBreak::Low } else { TieBreak::High };
        let config = RangeBarConfig::new(range).with_tie_break(tie_break);

        let bars = range_bars(&time, &high, &low, &config).unwrap();

        prop_assert!(!bars.is_empty());
        prop_assert!(bars.windows(2).all(|w| w[0].time <= w[1].time));
        prop_assert!(bars.iter().all(|b| time.contains(&b.time)));
        for b in &bars[..bars.len() - 1] {
            prop_assert!((b.height() - range).abs() < TOL);
        }
    }

    #[test]
    fn range_bars_via_series_match_slices(steps in steps(), range in 0.25..5.0f64) {
        let closes = walk(100.0, &steps);
        let series = series_from_closes(&closes);
        let config = RangeBarConfig::new(range);
        let via_series = to_range_bars(&series, &config).unwrap().to_bars();
        let direct = range_bars(series.time(), series.high(), series.low(), &config).unwrap();
        prop_assert_eq!(via_series, direct);
    }
}
