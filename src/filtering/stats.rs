//! Per-instance operation timing.
//!
//! Every filter embeds one [`OpStats`]. Read-only lookups record timings too,
//! so the counters live behind atomics and are updated through `&self`: the
//! lookup path stays immutable while the instrumentation is mutated alongside
//! it.
//!
//! The three counters are updated independently with relaxed ordering. Each is
//! monotonic on its own; a reader racing with writers may observe a total time
//! and an operation count from slightly different moments.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const NANOS_PER_MS: f64 = 1_000_000.0;

/// Running operation counters for one filter instance.
#[derive(Debug, Default)]
pub struct OpStats {
    total_operations: AtomicU64,
    total_nanos: AtomicU64,
    last_nanos: AtomicU64,
}

impl OpStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op`, recording its wall-clock duration as one operation.
    #[inline]
    pub fn time<T>(&self, op: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = op();
        self.record(start.elapsed());
        out
    }

    /// Like [`time`](Self::time), but only successful operations are recorded.
    #[inline]
    pub fn try_time<T, E>(&self, op: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let start = Instant::now();
        let out = op()?;
        self.record(start.elapsed());
        Ok(out)
    }

    /// Record one completed operation that took `elapsed`.
    pub fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.last_nanos.store(nanos, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.total_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Duration of the most recent operation, in milliseconds (0 before any).
    pub fn last_operation_time_ms(&self) -> f64 {
        self.last_nanos.load(Ordering::Relaxed) as f64 / NANOS_PER_MS
    }

    pub fn total_operations(&self) -> u64 {
        self.total_operations.load(Ordering::Relaxed)
    }

    /// Cumulative time across all operations, in milliseconds.
    pub fn total_time_ms(&self) -> f64 {
        self.total_nanos.load(Ordering::Relaxed) as f64 / NANOS_PER_MS
    }

    /// Mean operation latency in milliseconds; 0.0 before the first operation.
    pub fn average_operation_time_ms(&self) -> f64 {
        let ops = self.total_operations();
        if ops == 0 {
            0.0
        } else {
            self.total_time_ms() / ops as f64
        }
    }

    pub fn snapshot(&self) -> FilterStats {
        let total_operations = self.total_operations();
        let total_time_ms = self.total_time_ms();
        FilterStats {
            total_operations,
            total_time_ms,
            last_operation_time_ms: self.last_operation_time_ms(),
            average_operation_time_ms: if total_operations == 0 {
                0.0
            } else {
                total_time_ms / total_operations as f64
            },
        }
    }
}

/// Point-in-time copy of a filter's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FilterStats {
    pub total_operations: u64,
    pub total_time_ms: f64,
    pub last_operation_time_ms: f64,
    pub average_operation_time_ms: f64,
}
