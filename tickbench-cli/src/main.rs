//! tickbench CLI — benchmark moving-average strategies over tick data.
//!
//! Commands:
//! - `run`: load ticks (CSV or synthetic), run the harness, write artifacts
//! - `default-config`: print the default TOML configuration

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tickbench_core::strategy::StrategySpec;
use tickbench_core::{generate_ticks, load_ticks, LoadedTicks};
use tickbench_runner::{
    make_slices, profile_runtime_memory, profiling, run_strategy, save_artifacts, BenchConfig,
    ResultRow,
};

#[derive(Parser)]
#[command(
    name = "tickbench",
    about = "tickbench: runtime and memory scaling of moving-average strategies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark and write results, report and charts.
    Run(RunArgs),
    /// Print the default TOML config.
    DefaultConfig,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick CSV with timestamp, symbol and price columns.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Keep only ticks for this symbol.
    #[arg(long)]
    symbol: Option<String>,

    /// Input sizes to benchmark, comma separated (e.g. 1000,10000).
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Extra window sizes; each adds a windowed and an optimized strategy.
    #[arg(long, value_delimiter = ',')]
    windows: Option<Vec<usize>>,

    /// Use N synthetic ticks instead of a CSV file.
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic ticks.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the call-profiled pass.
    #[arg(long, default_value_t = false)]
    no_profile: bool,

    /// Skip the memory-sampled pass.
    #[arg(long, default_value_t = false)]
    no_memory: bool,

    /// Print each trial's hotspot table.
    #[arg(long, default_value_t = false)]
    show_profiles: bool,

    /// Output directory for artifacts.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
    profiling::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_benchmark(args),
        Commands::DefaultConfig => {
            print!("{}", BenchConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn build_config(args: &RunArgs) -> Result<BenchConfig> {
    let mut config = match &args.config {
        Some(path) => BenchConfig::from_file(path)?,
        None => BenchConfig::default(),
    };

    if let Some(csv) = &args.csv {
        config.data.csv_path = Some(csv.clone());
        config.data.synthetic_ticks = None;
    }
    if let Some(symbol) = &args.symbol {
        config.data.symbol = Some(symbol.clone());
    }
    if let Some(n) = args.synthetic {
        config.data.synthetic_ticks = Some(n);
    }
    if let Some(seed) = args.seed {
        config.data.seed = seed;
    }
    if let Some(sizes) = &args.sizes {
        config.bench.sizes = sizes.clone();
    }
    if let Some(windows) = &args.windows {
        for &window_size in windows {
            config.push_strategy(StrategySpec::Windowed { window_size });
            config.push_strategy(StrategySpec::Optimized { window_size });
        }
    }
    if args.no_profile {
        config.bench.profile_calls = false;
    }
    if args.no_memory {
        config.bench.measure_memory = false;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn load_data(config: &BenchConfig) -> Result<LoadedTicks> {
    if let Some(n) = config.data.synthetic_ticks {
        let symbols: Vec<&str> = config
            .data
            .synthetic_symbols
            .iter()
            .map(String::as_str)
            .collect();
        let mut ticks = generate_ticks(&symbols, n, config.data.seed);
        if let Some(symbol) = &config.data.symbol {
            ticks.retain(|t| &t.symbol == symbol);
        }
        return Ok(LoadedTicks::from_ticks(ticks));
    }

    let Some(path) = &config.data.csv_path else {
        bail!("no data source: pass --csv or --synthetic");
    };
    load_ticks(path, config.data.symbol.as_deref())
        .with_context(|| format!("failed to load ticks from {}", path.display()))
}

fn run_benchmark(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let (data, load_time) = profiling::profile("load_data", || load_data(&config));
    let data = data?;
    if data.is_empty() {
        bail!("no ticks to benchmark");
    }
    info!(
        ticks = data.len(),
        symbols = ?data.symbols,
        dataset = %data.dataset_hash,
        ms = load_time.as_secs_f64() * 1000.0,
        "data loaded"
    );

    let slices = make_slices(&data.ticks, &config.bench.sizes);
    let opts = config.bench.harness_options();
    let rows = profile_runtime_memory(&config.strategies, &slices, run_strategy, &opts)?;

    print_rows(&rows);
    if args.show_profiles {
        for row in &rows {
            if let Some(profile) = &row.profile_top {
                println!("\n── {} (N={}) ──\n{profile}", row.strategy, row.n_ticks);
            }
        }
    }

    let paths = {
        let _scope = profiling::ProfileScope::new("save_artifacts");
        save_artifacts(&rows, &config.output.dir, &config.output.report)?
    };
    debug!(scopes = profiling::total_operations(), "profiled scopes");
    println!("\nResults: {}", paths.results_json.display());
    println!("Report:  {}", paths.report.display());
    if let Some(chart) = &paths.runtime_chart {
        println!("Charts:  {}", chart.display());
    }

    Ok(())
}

fn print_rows(rows: &[ResultRow]) {
    println!(
        "{:<20} {:>10} {:>12} {:>12} {:>10} {:>10}",
        "strategy", "n_ticks", "seconds", "µs/tick", "peak_mib", "signals"
    );
    for row in rows {
        let per_tick = row
            .per_tick_micros()
            .map_or_else(|| "NA".to_string(), |v| format!("{v:.3}"));
        let peak = row
            .peak_mib
            .map_or_else(|| "NA".to_string(), |v| format!("{v:.2}"));
        println!(
            "{:<20} {:>10} {:>12.6} {:>12} {:>10} {:>10}",
            row.strategy, row.n_ticks, row.seconds, per_tick, peak, row.signals
        );
    }
}
