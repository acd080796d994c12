//! Tick — one timestamped price observation for a symbol.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single market price observation.
///
/// Produced once by ingestion and read-only afterwards. A tick sequence is
/// shared by reference across every strategy trial in a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp: NaiveDateTime, symbol: impl Into<String>, price: f64) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            price,
        }
    }
}
