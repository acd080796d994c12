//! Naive moving average — full-history mean recomputed on every tick.
//!
//! This is the asymptotic baseline: the mean is summed from scratch over the
//! symbol's entire price history each time, so a single-symbol stream of N
//! ticks costs O(N²). Do not optimize it.

use std::collections::HashMap;

use crate::domain::{Side, Signal, Tick};

use super::Strategy;

#[derive(Debug, Clone, Default)]
pub struct NaiveMovingAverage {
    history: HashMap<String, Vec<f64>>,
}

impl NaiveMovingAverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prices retained for `symbol` (grows without bound).
    pub fn history_len(&self, symbol: &str) -> usize {
        self.history.get(symbol).map_or(0, Vec::len)
    }

    /// Number of symbols seen so far.
    pub fn symbol_count(&self) -> usize {
        self.history.len()
    }
}

impl Strategy for NaiveMovingAverage {
    fn name(&self) -> &str {
        "naive_moving_average"
    }

    fn generate_signals(&mut self, tick: &Tick) -> Vec<Signal> {
        let prices = self.history.entry(tick.symbol.clone()).or_default();
        prices.push(tick.price);

        // Full recomputation, O(len).
        let average = prices.iter().sum::<f64>() / prices.len() as f64;

        match Side::classify(tick.price, average) {
            Some(side) => vec![Signal::from_tick(tick, side).with_meta("average", average)],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{assert_approx, make_ticks, DEFAULT_EPSILON};

    #[test]
    fn first_tick_ties_and_emits_nothing() {
        let mut s = NaiveMovingAverage::new();
        let ticks = make_ticks("X", &[10.0]);
        assert!(s.generate_signals(&ticks[0]).is_empty());
        assert_eq!(s.history_len("X"), 1);
    }

    #[test]
    fn monotonic_increase_buys_after_first_tick() {
        let prices: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        let ticks = make_ticks("X", &prices);
        let mut s = NaiveMovingAverage::new();

        for (i, tick) in ticks.iter().enumerate() {
            let out = s.generate_signals(tick);
            if i == 0 {
                assert!(out.is_empty());
            } else {
                assert_eq!(out.len(), 1, "tick {i}");
                assert_eq!(out[0].side, Side::Buy);
            }
        }
    }

    #[test]
    fn average_uses_entire_history() {
        let ticks = make_ticks("X", &[10.0, 20.0, 15.0, 30.0]);
        let mut s = NaiveMovingAverage::new();
        let mut last = Vec::new();
        for t in &ticks {
            last = s.generate_signals(t);
        }
        // mean(10, 20, 15, 30) = 18.75, price 30 above it.
        assert_eq!(last[0].side, Side::Buy);
        assert_approx(last[0].meta_value("average").unwrap(), 18.75, DEFAULT_EPSILON);
        assert_eq!(s.history_len("X"), 4);
    }

    #[test]
    fn symbols_keep_separate_histories() {
        let mut s = NaiveMovingAverage::new();
        let mut ticks = make_ticks("A", &[1.0, 2.0, 3.0]);
        ticks.extend(make_ticks("B", &[100.0]));
        for t in &ticks {
            s.generate_signals(t);
        }
        assert_eq!(s.history_len("A"), 3);
        assert_eq!(s.history_len("B"), 1);
        assert_eq!(s.history_len("C"), 0);
        assert_eq!(s.symbol_count(), 2);
    }
}
