//! Strategy core — streaming moving-average strategies.
//!
//! Every strategy consumes one tick at a time, in arrival order, and returns
//! the signals that tick produced. Per-symbol state lives inside the strategy
//! instance; ticks for any number of symbols may interleave.
//!
//! Three variants share the [`Strategy`] trait and differ only in cost:
//! - [`NaiveMovingAverage`]: full-history mean, O(n) per tick, O(N²) total
//! - [`WindowedMovingAverage`]: bounded window with running sum, O(1) per tick
//! - [`OptimizedMovingAverage`]: same window, edge-triggered emission

pub mod naive;
pub mod optimized;
pub mod window;
pub mod windowed;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Signal, Tick};

pub use naive::NaiveMovingAverage;
pub use optimized::OptimizedMovingAverage;
pub use window::RollingWindow;
pub use windowed::WindowedMovingAverage;

/// Errors raised while constructing a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("window_size must be positive, got {window_size}")]
    InvalidWindow { window_size: usize },
}

/// Trait for tick-driven strategies.
///
/// # Contract
/// `generate_signals` is called exactly once per tick, in sequence order.
/// It never fails for a well-formed tick; an empty vector means "no signal".
pub trait Strategy: Send {
    /// Human-readable name (e.g., "windowed_moving_average").
    fn name(&self) -> &str;

    /// Process one tick and return the signals it produced.
    fn generate_signals(&mut self, tick: &Tick) -> Vec<Signal>;
}

/// Serializable description of a strategy variant and its parameters.
///
/// A spec is a constructor, not an instance: [`StrategySpec::build`] returns a
/// brand-new strategy with empty state every time it is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    Naive,
    Windowed { window_size: usize },
    Optimized { window_size: usize },
}

impl StrategySpec {
    /// Construct a fresh strategy instance.
    pub fn build(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        Ok(match *self {
            StrategySpec::Naive => Box::new(NaiveMovingAverage::new()),
            StrategySpec::Windowed { window_size } => {
                Box::new(WindowedMovingAverage::new(window_size)?)
            }
            StrategySpec::Optimized { window_size } => {
                Box::new(OptimizedMovingAverage::new(window_size)?)
            }
        })
    }

    /// Check parameters without building.
    pub fn validate(&self) -> Result<(), StrategyError> {
        match *self {
            StrategySpec::Naive => Ok(()),
            StrategySpec::Windowed { window_size } | StrategySpec::Optimized { window_size } => {
                RollingWindow::validate(window_size)
            }
        }
    }

    /// Default display label, e.g. `naive`, `windowed_k10`, `optimized_k10`.
    pub fn label(&self) -> String {
        match *self {
            StrategySpec::Naive => "naive".to_string(),
            StrategySpec::Windowed { window_size } => format!("windowed_k{window_size}"),
            StrategySpec::Optimized { window_size } => format!("optimized_k{window_size}"),
        }
    }
}

/// Create ticks for a single symbol from a price list, one second apart.
#[cfg(test)]
pub fn make_ticks(symbol: &str, prices: &[f64]) -> Vec<Tick> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Tick::new(base + chrono::Duration::seconds(i as i64), symbol, price))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;
