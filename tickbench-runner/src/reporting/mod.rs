//! Reporting and artifact export pipeline.

#[cfg(feature = "charts")]
pub mod charts;
pub mod export;
pub mod markdown;

pub use export::{rows_to_csv, rows_to_json, save_artifacts, ArtifactPaths};
pub use markdown::write_report;

use crate::result::ResultRow;

/// Rows sorted by (strategy, n_ticks).
pub(crate) fn sorted_rows(rows: &[ResultRow]) -> Vec<&ResultRow> {
    let mut sorted: Vec<&ResultRow> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        a.strategy
            .cmp(&b.strategy)
            .then_with(|| a.n_ticks.cmp(&b.n_ticks))
    });
    sorted
}

/// Rows grouped per strategy (alphabetical), each group sorted by n_ticks.
#[cfg(feature = "charts")]
pub(crate) fn rows_by_strategy(
    rows: &[ResultRow],
) -> std::collections::BTreeMap<&str, Vec<&ResultRow>> {
    let mut groups: std::collections::BTreeMap<&str, Vec<&ResultRow>> =
        std::collections::BTreeMap::new();
    for row in sorted_rows(rows) {
        groups.entry(row.strategy.as_str()).or_default().push(row);
    }
    groups
}
