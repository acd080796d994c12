//! Scaling charts (runtime and peak memory vs input size).

use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

use crate::result::ResultRow;

use super::rows_by_strategy;

const SIZE: (u32, u32) = (900, 600);

/// Runtime (seconds) vs N, one line per strategy.
pub fn plot_runtime(rows: &[ResultRow], out_path: &Path) -> Result<()> {
    let series: Vec<(String, Vec<(f64, f64)>)> = rows_by_strategy(rows)
        .into_iter()
        .map(|(name, group)| {
            let points = group
                .iter()
                .map(|r| (r.n_ticks as f64, r.seconds))
                .collect();
            (name.to_string(), points)
        })
        .collect();
    draw_lines(out_path, "Runtime vs Input Size", "Runtime (s)", &series)
}

/// Peak process memory (MiB) vs N; rows without a reading are skipped.
pub fn plot_memory(rows: &[ResultRow], out_path: &Path) -> Result<()> {
    let series: Vec<(String, Vec<(f64, f64)>)> = rows_by_strategy(rows)
        .into_iter()
        .map(|(name, group)| {
            let points = group
                .iter()
                .filter_map(|r| r.peak_mib.map(|m| (r.n_ticks as f64, m)))
                .collect();
            (name.to_string(), points)
        })
        .collect();
    draw_lines(
        out_path,
        "Peak Memory vs Input Size (Process-Level)",
        "Peak Memory (MiB)",
        &series,
    )
}

fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

fn draw_lines(
    out_path: &Path,
    title: &str,
    y_label: &str,
    series: &[(String, Vec<(f64, f64)>)],
) -> Result<()> {
    let root = BitMapBackend::new(out_path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("chart fill: {e}"))?;

    let (x_lo, x_hi) = axis_range(series.iter().flat_map(|(_, p)| p.iter().map(|(x, _)| *x)));
    let (y_lo, y_hi) = axis_range(series.iter().flat_map(|(_, p)| p.iter().map(|(_, y)| *y)));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| anyhow!("chart build: {e}"))?;

    chart
        .configure_mesh()
        .x_desc("N ticks")
        .y_desc(y_label)
        .draw()
        .map_err(|e| anyhow!("chart mesh: {e}"))?;

    for (idx, (name, points)) in series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| anyhow!("chart series: {e}"))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
            .map_err(|e| anyhow!("chart markers: {e}"))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow!("chart legend: {e}"))?;

    root.present().map_err(|e| anyhow!("chart write {}: {e}", out_path.display()))?;
    Ok(())
}
