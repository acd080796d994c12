//! Synthetic tick generation.
//!
//! Produces a seeded random walk per symbol, interleaving symbols round-robin
//! one second apart. Used for benchmarking without a data file and by tests.
//! Identical `(symbols, n, seed)` always yields identical ticks.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Tick;

const START_PRICE: f64 = 100.0;

fn base_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Generate `n` ticks across `symbols` (round-robin) from a seeded random walk.
///
/// Each step moves the symbol's price by up to ±0.5%. Returns an empty
/// vector when `symbols` is empty.
pub fn generate_ticks(symbols: &[&str], n: usize, seed: u64) -> Vec<Tick> {
    if symbols.is_empty() {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut prices = vec![START_PRICE; symbols.len()];
    let base = base_timestamp();

    (0..n)
        .map(|i| {
            let slot = i % symbols.len();
            let step: f64 = rng.gen_range(-0.005..0.005);
            prices[slot] *= 1.0 + step;
            Tick::new(
                base + Duration::seconds(i as i64),
                symbols[slot],
                prices[slot],
            )
        })
        .collect()
}
