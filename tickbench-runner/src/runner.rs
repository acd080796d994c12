//! Runner — drives a strategy across a tick sequence.
//!
//! The runner is the measurement seam: the harness times, profiles and
//! memory-samples calls to a [`Runner`], never the strategy directly.

use tickbench_core::domain::Tick;
use tickbench_core::strategy::Strategy;

/// Signature shared by every runner the harness can drive.
pub type Runner = fn(&mut dyn Strategy, &[Tick]) -> usize;

/// Feed `ticks` to `strategy` one at a time, in order, and return the total
/// number of signals emitted.
///
/// Ticks are never reordered or batched: the edge-triggered strategy's output
/// depends on call order.
pub fn run_strategy(strategy: &mut dyn Strategy, ticks: &[Tick]) -> usize {
    let mut total_signals = 0;
    for tick in ticks {
        total_signals += strategy.generate_signals(tick).len();
    }
    total_signals
}

/// A prefix of the tick sequence labelled with the size that was requested.
#[derive(Debug, Clone, Copy)]
pub struct TickSlice<'a> {
    /// Requested input size (may exceed `ticks.len()` for short inputs).
    pub n: usize,
    pub ticks: &'a [Tick],
}

/// Return `(n, ticks[..min(n, len)])` for each requested size, in order.
pub fn make_slices<'a>(ticks: &'a [Tick], sizes: &[usize]) -> Vec<TickSlice<'a>> {
    sizes
        .iter()
        .map(|&n| TickSlice {
            n,
            ticks: &ticks[..n.min(ticks.len())],
        })
        .collect()
}
