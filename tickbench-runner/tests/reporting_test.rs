//! Artifact export end to end.

use tickbench_core::generate_ticks;
use tickbench_runner::reporting::export::{RESULTS_CSV, RESULTS_JSON};
use tickbench_runner::{
    default_strategies, make_slices, profile_runtime_memory, run_strategy, save_artifacts,
    HarnessOptions, ResultRow,
};

fn run_small_benchmark() -> Vec<ResultRow> {
    let ticks = generate_ticks(&["BTC", "ETH"], 400, 3);
    let slices = make_slices(&ticks, &[100, 400]);
    let opts = HarnessOptions {
        measure_memory: false,
        ..HarnessOptions::default()
    };
    profile_runtime_memory(&default_strategies(), &slices, run_strategy, &opts).unwrap()
}

#[test]
fn save_artifacts_writes_results_report_and_profiles() {
    let rows = run_small_benchmark();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("artifacts");

    let paths = save_artifacts(&rows, &out, "complexity_report.md").unwrap();

    assert_eq!(paths.results_json, out.join(RESULTS_JSON));
    assert_eq!(paths.results_csv, out.join(RESULTS_CSV));

    let json = std::fs::read_to_string(&paths.results_json).unwrap();
    let back: Vec<ResultRow> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rows);

    let csv = std::fs::read_to_string(&paths.results_csv).unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    assert_eq!(reader.records().count(), rows.len());

    let report = std::fs::read_to_string(&paths.report).unwrap();
    assert!(report.starts_with("# Complexity Report"));
    assert!(report.contains("| naive | 400 |"));
    assert!(report.contains("| optimized_k10 | 100 |"));

    assert_eq!(paths.profiles.len(), rows.len());
    assert!(paths.profiles.iter().all(|p| p.exists()));
    assert!(out.join("profiles").join("naive_n400.txt").exists());
}

#[test]
fn report_shows_na_when_memory_was_not_measured() {
    let rows = run_small_benchmark();
    let dir = tempfile::tempdir().unwrap();
    let paths = save_artifacts(&rows, dir.path(), "report.md").unwrap();
    let report = std::fs::read_to_string(paths.report).unwrap();
    assert!(report.lines().filter(|l| l.starts_with("| naive")).all(|l| l.contains("| NA |")));
}

#[test]
fn every_image_link_in_the_report_points_at_a_written_file() {
    let rows = run_small_benchmark();
    let dir = tempfile::tempdir().unwrap();
    let paths = save_artifacts(&rows, dir.path(), "report.md").unwrap();
    let report = std::fs::read_to_string(&paths.report).unwrap();

    let links: Vec<&str> = report
        .lines()
        .filter(|l| l.starts_with("!["))
        .filter_map(|l| l.split_once("](").map(|(_, rest)| rest.trim_end_matches(')')))
        .collect();
    assert_eq!(links.len(), if paths.runtime_chart.is_some() { 2 } else { 0 });
    for link in links {
        assert!(dir.path().join(link).exists(), "dangling link {link}");
    }
}
