//! CSV tick ingestion.
//!
//! Reads a CSV file with at least `timestamp`, `symbol` and `price` columns
//! (extra columns are ignored) into an ordered, in-memory tick sequence.
//!
//! Loading is all-or-nothing: a missing column, an unparseable price or a
//! timestamp matching neither accepted format fails the whole load. The only
//! rows ever skipped are those filtered out by the optional symbol filter.
//!
//! Accepted timestamp formats:
//! 1. `YYYY-MM-DD HH:MM:SS` (fast path)
//! 2. ISO-8601: `T` or space separator, optional fractional seconds, optional
//!    `Z` / `±HH:MM` offset (normalized to UTC), or a bare `YYYY-MM-DD`

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Tick;

const REQUIRED_COLUMNS: [&str; 3] = ["timestamp", "symbol", "price"];

/// Errors from the ingestion layer.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV must contain columns {required:?}; got {found:?}")]
    MissingColumns {
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("line {line}: unrecognized timestamp format: {value:?}")]
    BadTimestamp { line: u64, value: String },

    #[error("line {line}: invalid price: {value:?}")]
    BadPrice { line: u64, value: String },
}

/// Result of loading ticks, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedTicks {
    /// Ticks in file order.
    pub ticks: Vec<Tick>,
    /// Distinct symbols in first-seen order.
    pub symbols: Vec<String>,
    /// BLAKE3 digest over every loaded tick.
    pub dataset_hash: String,
}

impl LoadedTicks {
    pub fn from_ticks(ticks: Vec<Tick>) -> Self {
        let mut symbols: Vec<String> = Vec::new();
        for tick in &ticks {
            if !symbols.iter().any(|s| s == &tick.symbol) {
                symbols.push(tick.symbol.clone());
            }
        }
        let dataset_hash = compute_dataset_hash(&ticks);
        Self {
            ticks,
            symbols,
            dataset_hash,
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// Load every tick from a CSV file, optionally keeping only `symbol_filter`.
pub fn load_ticks(path: &Path, symbol_filter: Option<&str>) -> Result<LoadedTicks, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_ticks_from_reader(file, symbol_filter)?;
    info!(
        path = %path.display(),
        ticks = loaded.len(),
        symbols = loaded.symbols.len(),
        "loaded ticks"
    );
    Ok(loaded)
}

/// Load ticks from any CSV source.
pub fn load_ticks_from_reader<R: Read>(
    reader: R,
    symbol_filter: Option<&str>,
) -> Result<LoadedTicks, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (ts_idx, sym_idx, price_idx) = match (column("timestamp"), column("symbol"), column("price"))
    {
        (Some(t), Some(s), Some(p)) => (t, s, p),
        _ => {
            return Err(IngestError::MissingColumns {
                required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: headers,
            })
        }
    };

    let mut ticks = Vec::new();
    let mut skipped = 0usize;

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let symbol = record.get(sym_idx).unwrap_or_default().trim();
        if let Some(filter) = symbol_filter {
            if symbol != filter {
                skipped += 1;
                continue;
            }
        }

        let raw_ts = record.get(ts_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| IngestError::BadTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let raw_price = record.get(price_idx).unwrap_or_default();
        let price: f64 = raw_price
            .trim()
            .parse()
            .map_err(|_| IngestError::BadPrice {
                line,
                value: raw_price.to_string(),
            })?;

        ticks.push(Tick::new(timestamp, symbol, price));
    }

    if skipped > 0 {
        debug!(skipped, filter = ?symbol_filter, "rows skipped by symbol filter");
    }

    Ok(LoadedTicks::from_ticks(ticks))
}

/// Parse a timestamp under either accepted format.
///
/// Returns `None` rather than a default so callers can surface the bad value.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let ts = raw.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.naive_utc());
    }

    const OFFSET_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
    ];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(ts, fmt) {
            return Some(dt.naive_utc());
        }
    }

    const NAIVE_FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Compute a deterministic BLAKE3 hash over all ticks, in sequence order.
pub fn compute_dataset_hash(ticks: &[Tick]) -> String {
    let mut hasher = blake3::Hasher::new();
    for tick in ticks {
        hasher.update(tick.symbol.as_bytes());
        hasher.update(tick.timestamp.to_string().as_bytes());
        hasher.update(&tick.price.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = "\
timestamp,symbol,price,volume
2024-01-02 09:30:00,BTC,42000.5,1
2024-01-02T09:30:01,ETH,2300.25,2
2024-01-02 09:30:02, BTC ,42001.0,3
";

    #[test]
    fn loads_all_rows_in_order() {
        let loaded = load_ticks_from_reader(SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.symbols, vec!["BTC".to_string(), "ETH".to_string()]);
        assert_eq!(loaded.ticks[1].price, 2300.25);
        assert_eq!(loaded.ticks[2].symbol, "BTC");
        assert!(!loaded.dataset_hash.is_empty());
    }

    #[test]
    fn symbol_filter_skips_other_rows() {
        let loaded = load_ticks_from_reader(SAMPLE.as_bytes(), Some("BTC")).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.ticks.iter().all(|t| t.symbol == "BTC"));
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "timestamp,ticker,price\n2024-01-02 00:00:00,BTC,1.0\n";
        let err = load_ticks_from_reader(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumns { .. }));
        assert!(err.to_string().contains("ticker"));
    }

    #[test]
    fn malformed_timestamp_fails_the_load() {
        let csv = "timestamp,symbol,price\n2024-01-02 00:00:00,BTC,1.0\n02/01/2024 10:00,BTC,2.0\n";
        let err = load_ticks_from_reader(csv.as_bytes(), None).unwrap_err();
        match err {
            IngestError::BadTimestamp { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "02/01/2024 10:00");
            }
            other => panic!("expected BadTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn malformed_price_fails_the_load() {
        let csv = "timestamp,symbol,price\n2024-01-02 00:00:00,BTC,abc\n";
        let err = load_ticks_from_reader(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, IngestError::BadPrice { line: 2, .. }));
    }

    #[test]
    fn filtered_rows_are_not_validated() {
        let csv = "timestamp,symbol,price\nnot-a-time,ETH,1.0\n2024-01-02 00:00:00,BTC,1.0\n";
        let loaded = load_ticks_from_reader(csv.as_bytes(), Some("BTC")).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn parses_fast_path_and_iso_variants() {
        let base = parse_timestamp("2024-01-02 09:30:00").unwrap();
        assert_eq!(parse_timestamp("2024-01-02T09:30:00").unwrap(), base);
        assert_eq!(parse_timestamp("  2024-01-02 09:30:00  ").unwrap(), base);
        assert_eq!(parse_timestamp("2024-01-02T09:30:00Z").unwrap(), base);
        assert_eq!(parse_timestamp("2024-01-02T11:30:00+02:00").unwrap(), base);
        assert_eq!(parse_timestamp("2024-01-02T09:30").unwrap(), base);

        let frac = parse_timestamp("2024-01-02T09:30:00.250").unwrap();
        assert_eq!(frac.nanosecond(), 250_000_000);

        let midnight = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn rejects_unrecognized_timestamps() {
        for bad in ["", "yesterday", "2024/01/02 09:30:00", "1704187800", "2024-13-40"] {
            assert!(parse_timestamp(bad).is_none(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn dataset_hash_is_order_sensitive() {
        let a = load_ticks_from_reader(SAMPLE.as_bytes(), None).unwrap();
        let mut reversed = a.ticks.clone();
        reversed.reverse();
        assert_ne!(a.dataset_hash, compute_dataset_hash(&reversed));
        assert_eq!(a.dataset_hash, compute_dataset_hash(&a.ticks));
    }
}
