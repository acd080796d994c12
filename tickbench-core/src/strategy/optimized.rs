//! Optimized moving average — windowed mean with edge-triggered emission.
//!
//! Uses the same bounded window as [`super::WindowedMovingAverage`], but the
//! side is BUY only when price is strictly above the mean (a tie is SELL), and
//! a signal is emitted only when that side differs from the last one emitted
//! for the symbol. Emitted signals carry no metadata.

use std::collections::HashMap;

use crate::domain::{Side, Signal, Tick};

use super::{RollingWindow, Strategy, StrategyError};

#[derive(Debug, Clone)]
struct SymbolState {
    window: RollingWindow,
    last_side: Option<Side>,
}

#[derive(Debug, Clone)]
pub struct OptimizedMovingAverage {
    window_size: usize,
    states: HashMap<String, SymbolState>,
}

impl OptimizedMovingAverage {
    /// Fails with [`StrategyError::InvalidWindow`] when `window_size` is 0.
    pub fn new(window_size: usize) -> Result<Self, StrategyError> {
        RollingWindow::validate(window_size)?;
        Ok(Self {
            window_size,
            states: HashMap::new(),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn window_len(&self, symbol: &str) -> usize {
        self.states.get(symbol).map_or(0, |s| s.window.len())
    }

    pub fn running_sum(&self, symbol: &str) -> f64 {
        self.states.get(symbol).map_or(0.0, |s| s.window.sum())
    }

    pub fn window_contents(&self, symbol: &str) -> Vec<f64> {
        self.states
            .get(symbol)
            .map(|s| s.window.prices().collect())
            .unwrap_or_default()
    }

    /// Last side emitted for `symbol`, if any.
    pub fn last_side(&self, symbol: &str) -> Option<Side> {
        self.states.get(symbol).and_then(|s| s.last_side)
    }
}

impl Strategy for OptimizedMovingAverage {
    fn name(&self) -> &str {
        "optimized_moving_average"
    }

    fn generate_signals(&mut self, tick: &Tick) -> Vec<Signal> {
        let window_size = self.window_size;
        let state = self
            .states
            .entry(tick.symbol.clone())
            .or_insert_with(|| SymbolState {
                window: RollingWindow::with_valid_capacity(window_size),
                last_side: None,
            });

        let average = state.window.push(tick.price);
        let side = if tick.price > average {
            Side::Buy
        } else {
            Side::Sell
        };

        if state.last_side == Some(side) {
            return Vec::new();
        }
        state.last_side = Some(side);
        vec![Signal::from_tick(tick, side)]
    }
}
