//! Harness integration tests: row shape, fresh-state discipline, determinism.

use tickbench_core::generate_ticks;
use tickbench_core::strategy::StrategySpec;
use tickbench_runner::{
    default_strategies, make_slices, profile_runtime_memory, run_strategy, HarnessOptions,
    NamedStrategy,
};

#[test]
fn one_row_per_strategy_and_size() {
    let ticks = generate_ticks(&["BTC", "ETH"], 2_000, 11);
    let slices = make_slices(&ticks, &[100, 1_000, 2_000]);
    let strategies = default_strategies();

    let rows =
        profile_runtime_memory(&strategies, &slices, run_strategy, &HarnessOptions::timing_only())
            .unwrap();

    assert_eq!(rows.len(), 9);
    for row in &rows {
        assert!(row.seconds >= 0.0);
        assert!(row.signals <= row.n_ticks);
    }
}

#[test]
fn same_pair_twice_gives_equal_signals() {
    let ticks = generate_ticks(&["BTC", "ETH"], 1_500, 23);
    let slices = make_slices(&ticks, &[1_500]);
    let strategies = default_strategies();
    let opts = HarnessOptions::default();

    let first = profile_runtime_memory(&strategies, &slices, run_strategy, &opts).unwrap();
    let second = profile_runtime_memory(&strategies, &slices, run_strategy, &opts).unwrap();

    let counts = |rows: &[tickbench_runner::ResultRow]| -> Vec<usize> {
        rows.iter().map(|r| r.signals).collect()
    };
    assert_eq!(counts(&first), counts(&second));
}

#[test]
fn larger_slices_do_not_inherit_state_from_smaller_ones() {
    let ticks = generate_ticks(&["X"], 600, 5);
    let slices = make_slices(&ticks, &[200, 600]);
    let strategies = vec![NamedStrategy::labelled(StrategySpec::Optimized { window_size: 5 })];

    let rows =
        profile_runtime_memory(&strategies, &slices, run_strategy, &HarnessOptions::default())
            .unwrap();

    for (row, slice) in rows.iter().zip(&slices) {
        let mut fresh = StrategySpec::Optimized { window_size: 5 }.build().unwrap();
        assert_eq!(row.signals, run_strategy(fresh.as_mut(), slice.ticks));
    }
}

#[test]
fn naive_row_counts_every_tick_after_the_first_on_a_rising_series() {
    let ticks: Vec<_> = generate_ticks(&["X"], 50, 0)
        .into_iter()
        .enumerate()
        .map(|(i, mut t)| {
            t.price = 100.0 + i as f64;
            t
        })
        .collect();
    let slices = make_slices(&ticks, &[50]);
    let rows = profile_runtime_memory(
        &[NamedStrategy::labelled(StrategySpec::Naive)],
        &slices,
        run_strategy,
        &HarnessOptions::timing_only(),
    )
    .unwrap();
    assert_eq!(rows[0].signals, 49);
}

#[test]
fn oversized_request_keeps_requested_n() {
    let ticks = generate_ticks(&["X"], 40, 9);
    let slices = make_slices(&ticks, &[1_000]);
    let rows = profile_runtime_memory(
        &[NamedStrategy::labelled(StrategySpec::Windowed { window_size: 3 })],
        &slices,
        run_strategy,
        &HarnessOptions::timing_only(),
    )
    .unwrap();
    assert_eq!(rows[0].n_ticks, 1_000);
    assert!(rows[0].signals <= 40);
}

#[test]
fn profile_report_names_the_strategy() {
    let ticks = generate_ticks(&["BTC", "ETH"], 300, 2);
    let slices = make_slices(&ticks, &[300]);
    let opts = HarnessOptions {
        measure_memory: false,
        ..HarnessOptions::default()
    };
    let rows = profile_runtime_memory(
        &[NamedStrategy::labelled(StrategySpec::Naive)],
        &slices,
        run_strategy,
        &opts,
    )
    .unwrap();

    let report = rows[0].profile_top.as_deref().unwrap();
    assert!(report.starts_with("300 calls to "));
    assert!(report.contains("BTC"));
    assert!(report.contains("ETH"));
    assert!(rows[0].peak_mib.is_none());
}

#[cfg(target_os = "linux")]
#[test]
fn memory_peak_is_reported_on_linux() {
    let ticks = generate_ticks(&["X"], 500, 8);
    let slices = make_slices(&ticks, &[500]);
    let opts = HarnessOptions {
        profile_calls: false,
        ..HarnessOptions::default()
    };
    let rows = profile_runtime_memory(
        &[NamedStrategy::labelled(StrategySpec::Naive)],
        &slices,
        run_strategy,
        &opts,
    )
    .unwrap();
    let peak = rows[0].peak_mib.unwrap();
    assert!(peak > 0.0);
}
