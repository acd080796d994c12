//! Artifact export — JSON, CSV, per-trial profiles, charts and the report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::result::ResultRow;

use super::markdown::write_report;

pub const RESULTS_JSON: &str = "results.json";
pub const RESULTS_CSV: &str = "results.csv";
pub const RUNTIME_PNG: &str = "runtime.png";
pub const MEMORY_PNG: &str = "memory.png";
pub const PROFILES_DIR: &str = "profiles";

/// Files written by [`save_artifacts`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub results_json: PathBuf,
    pub results_csv: PathBuf,
    pub report: PathBuf,
    pub profiles: Vec<PathBuf>,
    /// Present only when built with the `charts` feature.
    pub runtime_chart: Option<PathBuf>,
    pub memory_chart: Option<PathBuf>,
}

/// Serialize rows to pretty JSON (array of row objects).
pub fn rows_to_json(rows: &[ResultRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("failed to serialize result rows to JSON")
}

/// Serialize rows to CSV, one line per row with a header.
pub fn rows_to_csv(rows: &[ResultRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row).context("failed to write CSV row")?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn profile_file_name(row: &ResultRow) -> String {
    let safe: String = row
        .strategy
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("{safe}_n{}.txt", row.n_ticks)
}

/// Profile file names for `rows`, in order; a name already taken by an
/// earlier row gets that row's index appended.
fn unique_profile_names<'a>(rows: impl IntoIterator<Item = (usize, &'a ResultRow)>) -> Vec<String> {
    let mut used = HashSet::new();
    rows.into_iter()
        .map(|(idx, row)| {
            let mut name = profile_file_name(row);
            if used.contains(&name) {
                let stem = name.trim_end_matches(".txt").to_string();
                name = format!("{stem}_{idx}.txt");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Write every artifact for a benchmark run into `output_dir`.
pub fn save_artifacts(rows: &[ResultRow], output_dir: &Path, report_name: &str) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let results_json = output_dir.join(RESULTS_JSON);
    std::fs::write(&results_json, rows_to_json(rows)?)
        .with_context(|| format!("failed to write {}", results_json.display()))?;

    let results_csv = output_dir.join(RESULTS_CSV);
    std::fs::write(&results_csv, rows_to_csv(rows)?)
        .with_context(|| format!("failed to write {}", results_csv.display()))?;

    let mut profiles = Vec::new();
    let profiled: Vec<(usize, &ResultRow)> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.profile_top.is_some())
        .collect();
    if !profiled.is_empty() {
        let dir = output_dir.join(PROFILES_DIR);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create profile dir: {}", dir.display()))?;
        let names = unique_profile_names(profiled.iter().copied());
        for ((_, row), name) in profiled.iter().zip(names) {
            let text = row.profile_top.as_deref().unwrap_or_default();
            let path = dir.join(name);
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            profiles.push(path);
        }
    }

    #[cfg(feature = "charts")]
    let (runtime_chart, memory_chart) = {
        let runtime = output_dir.join(RUNTIME_PNG);
        let memory = output_dir.join(MEMORY_PNG);
        super::charts::plot_runtime(rows, &runtime)?;
        super::charts::plot_memory(rows, &memory)?;
        (Some(runtime), Some(memory))
    };
    #[cfg(not(feature = "charts"))]
    let (runtime_chart, memory_chart): (Option<PathBuf>, Option<PathBuf>) = (None, None);

    let report = output_dir.join(report_name);
    let runtime_link = runtime_chart.as_ref().map(|_| RUNTIME_PNG);
    let memory_link = memory_chart.as_ref().map(|_| MEMORY_PNG);
    std::fs::write(&report, write_report(rows, runtime_link, memory_link))
        .with_context(|| format!("failed to write {}", report.display()))?;

    info!(dir = %output_dir.display(), rows = rows.len(), "artifacts saved");

    Ok(ArtifactPaths {
        dir: output_dir.to_path_buf(),
        results_json,
        results_csv,
        report,
        profiles,
        runtime_chart,
        memory_chart,
    })
}
