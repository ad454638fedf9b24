//! Run metrics, reported through `tracing` at debug level.

use std::time::{Duration, Instant};

use jstream_operators::RunStats;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    pub op: &'static str,
    pub stats: RunStats,
    pub elapsed: Duration,
}

impl RunMetrics {
    pub fn rows_dropped(&self) -> u64 {
        self.stats.rows_in.saturating_sub(self.stats.rows_out)
    }

    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.rows_in as f64 / secs
        } else {
            0.0
        }
    }

    pub fn emit(&self) {
        debug!(
            target: "jstream::metrics",
            op = self.op,
            rows_in = self.stats.rows_in,
            rows_out = self.stats.rows_out,
            rows_dropped = self.rows_dropped(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            rows_per_sec = self.rows_per_sec(),
            "run complete"
        );
    }
}

/// Wall-clock timer for one run.
#[derive(Debug)]
pub struct RunTimer {
    op: &'static str,
    started: Instant,
}

impl RunTimer {
    pub fn start(op: &'static str) -> Self {
        Self {
            op,
            started: Instant::now(),
        }
    }

    /// Stop the clock and emit the metrics event.
    pub fn stop(self, stats: RunStats) -> RunMetrics {
        let metrics = RunMetrics {
            op: self.op,
            stats,
            elapsed: self.started.elapsed(),
        };
        metrics.emit();
        metrics
    }
}
