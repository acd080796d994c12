//! Signal — a strategy's buy/sell decision for one tick.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Tick;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Compare a price against an average.
    ///
    /// Above the average is `Buy`, below is `Sell`, and an exact tie produces
    /// no side at all.
    #[inline]
    pub fn classify(price: f64, average: f64) -> Option<Side> {
        if price > average {
            Some(Side::Buy)
        } else if price < average {
            Some(Side::Sell)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy-specific diagnostics attached to a signal (computed average,
/// window size, ...). Ordered so serialized output is stable.
pub type SignalMeta = BTreeMap<String, f64>;

/// An immutable decision emitted in response to a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    pub side: Side,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SignalMeta>,
}

impl Signal {
    /// Signal stamped with the tick's timestamp, symbol and price.
    pub fn from_tick(tick: &Tick, side: Side) -> Self {
        Self {
            timestamp: tick.timestamp,
            symbol: tick.symbol.clone(),
            side,
            price: tick.price,
            meta: None,
        }
    }

    /// Attach one metadata entry, creating the map on first use.
    pub fn with_meta(mut self, key: &str, value: f64) -> Self {
        self.meta
            .get_or_insert_with(SignalMeta::new)
            .insert(key.to_string(), value);
        self
    }

    /// Look up a metadata entry.
    pub fn meta_value(&self, key: &str) -> Option<f64> {
        self.meta.as_ref().and_then(|m| m.get(key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tick(price: f64) -> Tick {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Tick::new(ts, "ETH", price)
    }

    #[test]
    fn classify_above_below_and_tie() {
        assert_eq!(Side::classify(11.0, 10.0), Some(Side::Buy));
        assert_eq!(Side::classify(9.0, 10.0), Some(Side::Sell));
        assert_eq!(Side::classify(10.0, 10.0), None);
    }

    #[test]
    fn side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"SELL\"");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn signal_copies_tick_fields() {
        let t = tick(3100.5);
        let sig = Signal::from_tick(&t, Side::Buy);
        assert_eq!(sig.timestamp, t.timestamp);
        assert_eq!(sig.symbol, "ETH");
        assert_eq!(sig.price, 3100.5);
        assert!(sig.meta.is_none());
    }

    #[test]
    fn with_meta_accumulates_entries() {
        let sig = Signal::from_tick(&tick(1.0), Side::Sell)
            .with_meta("average", 2.0)
            .with_meta("window", 10.0);
        assert_eq!(sig.meta_value("average"), Some(2.0));
        assert_eq!(sig.meta_value("window"), Some(10.0));
        assert_eq!(sig.meta_value("missing"), None);
    }

    #[test]
    fn signal_without_meta_omits_field_in_json() {
        let sig = Signal::from_tick(&tick(1.0), Side::Buy);
        let json = serde_json::to_string(&sig).unwrap();
        assert!(!json.contains("meta"));
        assert!(json.contains("\"side\":\"BUY\""));
    }
}
