//! tickbench core — ticks, signals, and the streaming strategy core.
//!
//! This crate contains:
//! - Domain types (ticks, signals, sides)
//! - The `Strategy` trait and its three moving-average variants
//! - CSV tick ingestion with timestamp normalization
//! - Seeded synthetic tick generation

pub mod domain;
pub mod ingest;
pub mod strategy;
pub mod synthetic;

pub use domain::{Side, Signal, SignalMeta, Tick};
pub use ingest::{load_ticks, load_ticks_from_reader, IngestError, LoadedTicks};
pub use strategy::{
    NaiveMovingAverage, OptimizedMovingAverage, Strategy, StrategyError, StrategySpec,
    WindowedMovingAverage,
};
pub use synthetic::generate_ticks;
