//! Profiling and timing instruments for benchmark trials.
//!
//! Provides:
//! - Manual timing scopes (`ProfileScope`, `profile`)
//! - Timed runs of a [`Runner`] (`time_run`)
//! - Per-call hotspot profiling (`CallProfiler`, `profile_calls`)
//!
//! # Usage
//!
//! ```
//! use tickbench_runner::profiling::ProfileScope;
//!
//! fn expensive_operation() {
//!     let _scope = ProfileScope::new("expensive_operation");
//!     // Work happens here...
//!     // Timing logged on drop
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `TICKBENCH_PROFILE=1` - Log every scope duration at debug level

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tickbench_core::domain::{Signal, Tick};
use tickbench_core::strategy::Strategy;
use tracing::debug;

use crate::runner::Runner;

/// Global flag to enable/disable scope logging.
static PROFILING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Global counter for total profiled scopes.
static TOTAL_OPERATIONS: AtomicU64 = AtomicU64::new(0);

/// Initialize profiling system.
///
/// Should be called once at program startup.
pub fn init() {
    let enabled = std::env::var("TICKBENCH_PROFILE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    PROFILING_ENABLED.store(enabled, Ordering::Relaxed);

    if enabled {
        debug!("scope profiling enabled (TICKBENCH_PROFILE=1)");
    }
}

/// Check if scope logging is currently enabled.
#[inline]
pub fn is_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

/// A profiling scope that measures execution time.
///
/// On drop, logs the duration if profiling is enabled.
pub struct ProfileScope {
    name: &'static str,
    start: Instant,
}

impl ProfileScope {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        TOTAL_OPERATIONS.fetch_add(1, Ordering::Relaxed);
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Get elapsed time without dropping the scope.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if is_enabled() {
            let duration = self.start.elapsed();
            debug!(
                scope = self.name,
                ms = duration.as_secs_f64() * 1000.0,
                "scope finished"
            );
        }
    }
}

/// Profile a closure and return its result along with duration.
pub fn profile<F, R>(name: &'static str, f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let scope = ProfileScope::new(name);
    let result = f();
    (result, scope.elapsed())
}

/// Get total number of profiled scopes since initialization.
pub fn total_operations() -> u64 {
    TOTAL_OPERATIONS.load(Ordering::Relaxed)
}

/// Run `runner` under a wall-clock timer.
pub fn time_run(runner: Runner, strategy: &mut dyn Strategy, ticks: &[Tick]) -> (Duration, usize) {
    let start = Instant::now();
    let signals = runner(strategy, ticks);
    (start.elapsed(), signals)
}

/// Aggregated call statistics for one symbol.
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    pub calls: u64,
    pub total: Duration,
    pub max: Duration,
    pub signals: u64,
}

impl CallStats {
    pub fn per_call(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.total.as_secs_f64() / self.calls as f64)
        }
    }
}

/// Strategy wrapper that times every `generate_signals` call.
///
/// The wrapper is itself a [`Strategy`], so the runner drives it unchanged and
/// the wrapped strategy sees exactly the same calls in the same order. Calls
/// are aggregated per symbol, which shows where per-symbol state makes the
/// strategy expensive.
pub struct CallProfiler<'a> {
    inner: &'a mut dyn Strategy,
    per_symbol: HashMap<String, CallStats>,
}

impl<'a> CallProfiler<'a> {
    pub fn new(inner: &'a mut dyn Strategy) -> Self {
        Self {
            inner,
            per_symbol: HashMap::new(),
        }
    }

    pub fn stats(&self, symbol: &str) -> Option<&CallStats> {
        self.per_symbol.get(symbol)
    }

    pub fn total_calls(&self) -> u64 {
        self.per_symbol.values().map(|s| s.calls).sum()
    }

    /// Render a hotspot table of the `top_k` symbols by total time.
    pub fn report(&self, top_k: usize) -> String {
        let total_calls = self.total_calls();
        let total_time: Duration = self.per_symbol.values().map(|s| s.total).sum();

        let mut rows: Vec<(&String, &CallStats)> = self.per_symbol.iter().collect();
        rows.sort_by(|a, b| b.1.total.cmp(&a.1.total).then_with(|| a.0.cmp(b.0)));

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} calls to {}::generate_signals in {:.6} seconds",
            total_calls,
            self.inner.name(),
            total_time.as_secs_f64()
        );
        let _ = writeln!(out, "Ordered by: tottime");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:>10} {:>12} {:>12} {:>12} {:>10}  symbol",
            "ncalls", "tottime", "percall", "maxcall", "signals"
        );
        for (symbol, stats) in rows.into_iter().take(top_k) {
            let _ = writeln!(
                out,
                "{:>10} {:>12.6} {:>12.9} {:>12.9} {:>10}  {}",
                stats.calls,
                stats.total.as_secs_f64(),
                stats.per_call().as_secs_f64(),
                stats.max.as_secs_f64(),
                stats.signals,
                symbol
            );
        }
        out
    }
}

impl Strategy for CallProfiler<'_> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn generate_signals(&mut self, tick: &Tick) -> Vec<Signal> {
        let start = Instant::now();
        let signals = self.inner.generate_signals(tick);
        let elapsed = start.elapsed();

        let stats = self.per_symbol.entry(tick.symbol.clone()).or_default();
        stats.calls += 1;
        stats.total += elapsed;
        stats.max = stats.max.max(elapsed);
        stats.signals += signals.len() as u64;
        signals
    }
}

/// Run `runner` with every strategy call profiled.
///
/// Returns the wall-clock duration (including instrumentation overhead), the
/// signal count and the hotspot report.
pub fn profile_calls(
    runner: Runner,
    strategy: &mut dyn Strategy,
    ticks: &[Tick],
    top_k: usize,
) -> (Duration, usize, String) {
    let mut profiler = CallProfiler::new(strategy);
    let start = Instant::now();
    let signals = runner(&mut profiler, ticks);
    let elapsed = start.elapsed();
    (elapsed, signals, profiler.report(top_k))
}
