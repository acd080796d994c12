//! Benchmark harness: one result row per (strategy, input size).
//!
//! The harness holds strategy *specs*, never instances. Every run inside a
//! trial builds its own instance from its `StrategySpec`, so no state crosses from one
//! run, trial or size to the next.
//!
//! Per trial, in order:
//! 1. timed run (its elapsed time is the row's `seconds`)
//! 2. optional call-profiled run (report kept, count only cross-checked)
//! 3. optional memory-sampled run (peak kept, count discarded), followed by
//!    one more uninstrumented run that supplies the row's signal count
//!
//! Trials run sequentially on the calling thread so they cannot disturb each
//! other's cache behaviour or memory readings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tickbench_core::strategy::{Strategy, StrategyError, StrategySpec};

use crate::memory::{
    current_rss_mib, sample_peak_memory_with, RssReader, DEFAULT_SAMPLE_INTERVAL,
};
use crate::profiling::{profile_calls, time_run, ProfileScope};
use crate::result::ResultRow;
use crate::runner::{Runner, TickSlice};

/// Errors from the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("strategy '{name}': {source}")]
    Strategy {
        name: String,
        #[source]
        source: StrategyError,
    },
}

/// A named strategy constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedStrategy {
    pub name: String,
    #[serde(flatten)]
    pub spec: StrategySpec,
}

impl NamedStrategy {
    pub fn new(name: impl Into<String>, spec: StrategySpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    /// Named after `StrategySpec::label` (`naive`, `windowed_k10`, ...).
    pub fn labelled(spec: StrategySpec) -> Self {
        Self::new(spec.label(), spec)
    }

    /// Build a brand-new instance.
    pub fn build(&self) -> Result<Box<dyn Strategy>, HarnessError> {
        self.spec.build().map_err(|source| HarnessError::Strategy {
            name: self.name.clone(),
            source,
        })
    }
}

/// The three strategies benchmarked by default: naive, windowed_k10, optimized_k10.
pub fn default_strategies() -> Vec<NamedStrategy> {
    vec![
        NamedStrategy::labelled(StrategySpec::Naive),
        NamedStrategy::labelled(StrategySpec::Windowed { window_size: 10 }),
        NamedStrategy::labelled(StrategySpec::Optimized { window_size: 10 }),
    ]
}

/// Which instruments the harness runs.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Run a call-profiled pass and keep its hotspot report.
    pub profile_calls: bool,
    /// Run a memory-sampled pass and keep its peak reading.
    pub measure_memory: bool,
    pub sample_interval: Duration,
    /// Rows kept in the hotspot report.
    pub profile_top_k: usize,
    /// Memory source for the sampled pass.
    pub rss_reader: RssReader,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            profile_calls: true,
            measure_memory: true,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            profile_top_k: 15,
            rss_reader: current_rss_mib,
        }
    }
}

impl HarnessOptions {
    /// Timing only: no profiled or memory-sampled passes.
    pub fn timing_only() -> Self {
        Self {
            profile_calls: false,
            measure_memory: false,
            ..Self::default()
        }
    }
}

/// Measure every strategy on every slice.
///
/// Rows are ordered by slice, then by strategy, matching the input order.
/// All specs are validated before the first trial runs.
pub fn profile_runtime_memory(
    strategies: &[NamedStrategy],
    slices: &[TickSlice<'_>],
    runner: Runner,
    opts: &HarnessOptions,
) -> Result<Vec<ResultRow>, HarnessError> {
    for strategy in strategies {
        strategy
            .spec
            .validate()
            .map_err(|source| HarnessError::Strategy {
                name: strategy.name.clone(),
                source,
            })?;
    }

    let mut rows = Vec::with_capacity(strategies.len() * slices.len());
    for slice in slices {
        for strategy in strategies {
            rows.push(run_trial(strategy, slice, runner, opts)?);
        }
    }
    Ok(rows)
}

/// Run one (strategy, slice) trial and assemble its row.
pub fn run_trial(
    strategy: &NamedStrategy,
    slice: &TickSlice<'_>,
    runner: Runner,
    opts: &HarnessOptions,
) -> Result<ResultRow, HarnessError> {
    let _scope = ProfileScope::new("trial");
    let (elapsed, mut signals) = {
        let mut timed = strategy.build()?;
        time_run(runner, timed.as_mut(), slice.ticks)
    };

    let profile_top = if opts.profile_calls {
        let mut profiled = strategy.build()?;
        let (_, profiled_signals, report) =
            profile_calls(runner, profiled.as_mut(), slice.ticks, opts.profile_top_k);
        if profiled_signals != signals {
            warn!(
                strategy = %strategy.name,
                n_ticks = slice.n,
                timed = signals,
                profiled = profiled_signals,
                "profiled run disagrees with timed run; keeping timed count"
            );
        }
        Some(report)
    } else {
        None
    };

    let peak_mib = if opts.measure_memory {
        let peak = {
            let mut sampled = strategy.build()?;
            let (_sampled_signals, _, peak) =
                sample_peak_memory_with(opts.sample_interval, opts.rss_reader, || {
                    runner(sampled.as_mut(), slice.ticks)
                });
            peak
        };

        // The sampled count is not trusted; recount on a fresh, bare instance.
        let mut recount = strategy.build()?;
        let trusted = runner(recount.as_mut(), slice.ticks);
        if trusted != signals {
            warn!(
                strategy = %strategy.name,
                n_ticks = slice.n,
                timed = signals,
                recount = trusted,
                "recount disagrees with timed run"
            );
        }
        signals = trusted;
        peak
    } else {
        None
    };

    let row = ResultRow {
        strategy: strategy.name.clone(),
        n_ticks: slice.n,
        seconds: elapsed.as_secs_f64(),
        signals,
        peak_mib,
        profile_top,
    };
    info!(
        strategy = %row.strategy,
        n_ticks = row.n_ticks,
        seconds = row.seconds,
        signals = row.signals,
        peak_mib = ?row.peak_mib,
        "trial complete"
    );
    Ok(row)
}
