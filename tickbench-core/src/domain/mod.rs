//! Domain types for tickbench

pub mod signal;
pub mod tick;

pub use signal::{Side, Signal, SignalMeta};
pub use tick::Tick;
