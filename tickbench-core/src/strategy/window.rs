//! Bounded price window with an incrementally maintained running sum.
//!
//! Push adds the new price to the sum; if the window exceeds its capacity the
//! oldest price is popped and subtracted. Both steps are O(1). The sum is
//! never recomputed by scanning the window.

use std::collections::VecDeque;

use super::StrategyError;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    prices: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Result<Self, StrategyError> {
        Self::validate(capacity)?;
        Ok(Self::with_valid_capacity(capacity))
    }

    /// Caller guarantees `capacity >= 1` (strategies validate once at construction).
    pub(crate) fn with_valid_capacity(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            capacity,
            prices: VecDeque::with_capacity(capacity + 1),
            sum: 0.0,
        }
    }

    /// Window sizes must be at least 1.
    pub fn validate(capacity: usize) -> Result<(), StrategyError> {
        if capacity == 0 {
            return Err(StrategyError::InvalidWindow {
                window_size: capacity,
            });
        }
        Ok(())
    }

    /// Push a price, evicting the oldest if over capacity, and return the
    /// mean of the window after the update.
    ///
    /// The window is never empty after a push, so the division is safe.
    #[inline]
    pub fn push(&mut self, price: f64) -> f64 {
        self.prices.push_back(price);
        self.sum += price;
        if self.prices.len() > self.capacity {
            if let Some(evicted) = self.prices.pop_front() {
                self.sum -= evicted;
            }
        }
        self.sum / self.prices.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            RollingWindow::new(0).err(),
            Some(StrategyError::InvalidWindow { window_size: 0 })
        );
    }

    #[test]
    fn warm_up_mean_uses_partial_window() {
        let mut w = RollingWindow::new(3).unwrap();
        assert_approx(w.push(10.0), 10.0, DEFAULT_EPSILON);
        assert_approx(w.push(20.0), 15.0, DEFAULT_EPSILON);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn eviction_keeps_sum_exact() {
        let mut w = RollingWindow::new(3).unwrap();
        for p in [10.0, 20.0, 15.0, 30.0] {
            w.push(p);
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.prices().collect::<Vec<_>>(), vec![20.0, 15.0, 30.0]);
        assert_approx(w.sum(), 65.0, DEFAULT_EPSILON);
    }

    #[test]
    fn capacity_one_mean_is_latest_price() {
        let mut w = RollingWindow::new(1).unwrap();
        assert_eq!(w.push(3.0), 3.0);
        assert_eq!(w.push(8.0), 8.0);
        assert_eq!(w.len(), 1);
        assert_eq!(w.capacity(), 1);
    }
}
