//! Best-effort process memory sampling.
//!
//! A background thread polls the process resident set size (`VmRSS` from
//! `/proc/self/status`) at a fixed interval while a trial runs, and reports
//! the peak in MiB. Readings cover the whole process (loaded ticks, runtime,
//! allocator slack), not the strategy's own footprint.
//!
//! When the facility is unavailable (no procfs, non-Linux targets) sampling
//! degrades to `None` instead of failing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

/// Polling interval used when none is configured.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

const PROC_STATUS: &str = "/proc/self/status";

/// Source of resident-memory readings in MiB; `None` means unavailable.
pub type RssReader = fn() -> Option<f64>;

/// Current resident set size of this process in MiB, if readable.
pub fn current_rss_mib() -> Option<f64> {
    let status = std::fs::read_to_string(PROC_STATUS).ok()?;
    parse_vm_rss_kib(&status).map(|kib| kib as f64 / 1024.0)
}

/// Whether memory sampling works on this host.
pub fn is_available() -> bool {
    current_rss_mib().is_some()
}

fn parse_vm_rss_kib(status: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix("VmRSS:")?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

/// Handle to a running sampler thread.
pub struct MemorySampler {
    reader: RssReader,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<f64>,
}

impl MemorySampler {
    /// Take a baseline reading and start polling every `interval`.
    ///
    /// Returns `None` if memory cannot be read or the thread cannot spawn.
    pub fn start(interval: Duration) -> Option<Self> {
        Self::start_with(interval, current_rss_mib)
    }

    /// Like [`MemorySampler::start`], reading memory through `reader`.
    pub fn start_with(interval: Duration, reader: RssReader) -> Option<Self> {
        let baseline = reader()?;
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("memory-sampler".into())
            .spawn(move || {
                let mut peak = baseline;
                while !flag.load(Ordering::Acquire) {
                    thread::park_timeout(interval);
                    if let Some(mib) = reader() {
                        peak = peak.max(mib);
                    }
                }
                peak
            })
            .ok()?;

        Some(Self {
            reader,
            stop,
            handle,
        })
    }

    /// Stop polling and return the peak reading in MiB.
    ///
    /// A final reading is taken here, so runs shorter than one interval still
    /// report at least the start and end samples.
    pub fn stop(self) -> Option<f64> {
        self.stop.store(true, Ordering::Release);
        self.handle.thread().unpark();
        let peak = self.handle.join().ok()?;
        Some((self.reader)().map_or(peak, |last| peak.max(last)))
    }
}

/// Run `f` while sampling memory.
///
/// Returns `f`'s result, the wall-clock duration, and the peak MiB (`None`
/// when sampling is unavailable).
pub fn sample_peak_memory<F, R>(interval: Duration, f: F) -> (R, Duration, Option<f64>)
where
    F: FnOnce() -> R,
{
    sample_peak_memory_with(interval, current_rss_mib, f)
}

/// [`sample_peak_memory`] with an explicit memory source.
pub fn sample_peak_memory_with<F, R>(
    interval: Duration,
    reader: RssReader,
    f: F,
) -> (R, Duration, Option<f64>)
where
    F: FnOnce() -> R,
{
    let sampler = MemorySampler::start_with(interval, reader);
    if sampler.is_none() {
        debug!("memory sampling unavailable; peak will be reported as null");
    }

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    let peak = sampler.and_then(MemorySampler::stop);
    (result, elapsed, peak)
}
