//! tickbench runner — strategy execution, measurement and reporting.
//!
//! This crate builds on `tickbench-core` to provide:
//! - The default runner and input-size slicing
//! - Timing and per-call profiling of strategy runs
//! - Process-level peak memory sampling
//! - The benchmark harness producing one `ResultRow` per (strategy, size)
//! - TOML benchmark configuration
//! - JSON/CSV export, Markdown report, optional scaling charts

pub mod config;
pub mod harness;
pub mod memory;
pub mod profiling;
pub mod reporting;
pub mod result;
pub mod runner;

pub use config::{BenchConfig, BenchSettings, ConfigError, DataConfig, OutputConfig};
pub use harness::{
    default_strategies, profile_runtime_memory, run_trial, HarnessError, HarnessOptions,
    NamedStrategy,
};
pub use memory::{sample_peak_memory, sample_peak_memory_with, MemorySampler, RssReader};
pub use profiling::{profile_calls, time_run, CallProfiler, CallStats};
pub use reporting::{rows_to_csv, rows_to_json, save_artifacts, write_report, ArtifactPaths};
pub use result::ResultRow;
pub use runner::{make_slices, run_strategy, Runner, TickSlice};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn results_and_config_are_send_sync() {
        assert_send::<ResultRow>();
        assert_sync::<ResultRow>();
        assert_send::<BenchConfig>();
        assert_sync::<BenchConfig>();
        assert_send::<NamedStrategy>();
        assert_sync::<HarnessOptions>();
    }

    #[test]
    fn tick_slices_are_send_sync() {
        assert_send::<TickSlice<'static>>();
        assert_sync::<TickSlice<'static>>();
    }
}
