//! Windowed moving average — bounded window with running sum.
//!
//! Emits BUY above the window mean, SELL below it and nothing on an exact tie.
//! O(1) amortized per tick, O(k) state per symbol.

use std::collections::HashMap;

use crate::domain::{Side, Signal, Tick};

use super::{RollingWindow, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct WindowedMovingAverage {
    window_size: usize,
    windows: HashMap<String, RollingWindow>,
}

impl WindowedMovingAverage {
    /// Fails with [`StrategyError::InvalidWindow`] when `window_size` is 0.
    pub fn new(window_size: usize) -> Result<Self, StrategyError> {
        RollingWindow::validate(window_size)?;
        Ok(Self {
            window_size,
            windows: HashMap::new(),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn window_len(&self, symbol: &str) -> usize {
        self.windows.get(symbol).map_or(0, RollingWindow::len)
    }

    pub fn running_sum(&self, symbol: &str) -> f64 {
        self.windows.get(symbol).map_or(0.0, RollingWindow::sum)
    }

    pub fn window_contents(&self, symbol: &str) -> Vec<f64> {
        self.windows
            .get(symbol)
            .map(|w| w.prices().collect())
            .unwrap_or_default()
    }
}

impl Strategy for WindowedMovingAverage {
    fn name(&self) -> &str {
        "windowed_moving_average"
    }

    fn generate_signals(&mut self, tick: &Tick) -> Vec<Signal> {
        let window_size = self.window_size;
        let average = self
            .windows
            .entry(tick.symbol.clone())
            .or_insert_with(|| RollingWindow::with_valid_capacity(window_size))
            .push(tick.price);

        match Side::classify(tick.price, average) {
            Some(side) => vec![Signal::from_tick(tick, side)
                .with_meta("average", average)
                .with_meta("window", window_size as f64)],
            None => Vec::new(),
        }
    }
}
