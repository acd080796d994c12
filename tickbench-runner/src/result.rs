//! ResultRow — one benchmark measurement per (strategy, input size).

use serde::{Deserialize, Serialize};

/// A single harness trial result.
///
/// The serialized form is the reporting wire format and carries exactly the
/// keys `strategy`, `n_ticks`, `seconds`, `signals`, `peak_mib` and
/// `cprofile_top`; absent measurements serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub strategy: String,
    pub n_ticks: usize,
    /// Wall-clock seconds of the timed, uninstrumented run.
    pub seconds: f64,
    /// Total signals emitted over the slice.
    pub signals: usize,
    /// Peak process resident memory during the sampled run, in MiB.
    pub peak_mib: Option<f64>,
    /// Per-call hotspot summary from the profiled run.
    #[serde(rename = "cprofile_top")]
    pub profile_top: Option<String>,
}

impl ResultRow {
    /// Average runtime per tick in microseconds, if `n_ticks > 0`.
    pub fn per_tick_micros(&self) -> Option<f64> {
        (self.n_ticks > 0).then(|| self.seconds / self.n_ticks as f64 * 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ResultRow {
        ResultRow {
            strategy: "naive".into(),
            n_ticks: 1_000,
            seconds: 0.002,
            signals: 998,
            peak_mib: None,
            profile_top: None,
        }
    }

    #[test]
    fn serializes_exact_wire_keys_with_nulls() {
        let value = serde_json::to_value(row()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["cprofile_top", "n_ticks", "peak_mib", "seconds", "signals", "strategy"]
        );
        assert!(obj["peak_mib"].is_null());
        assert!(obj["cprofile_top"].is_null());
    }

    #[test]
    fn per_tick_micros() {
        assert!((row().per_tick_micros().unwrap() - 2.0).abs() < 1e-9);
        let mut empty = row();
        empty.n_ticks = 0;
        assert_eq!(empty.per_tick_micros(), None);
    }
}
