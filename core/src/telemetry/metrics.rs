use serde::Serialize;
use std::sync::Mutex;

/// Counters for completed multiplications.
///
/// Only the orchestrating thread updates these, after its workers have been
/// joined, so the lock is never taken on the compute path.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub multiplications: usize,
    pub workers_spawned: usize,
    pub rows_computed: usize,
    pub failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_multiplication(&self, workers: usize, rows: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.multiplications += 1;
            metrics.workers_spawned += workers;
            metrics.rows_computed += rows;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = MetricsRecorder::new();
        metrics.record_multiplication(3, 7);
        metrics.record_multiplication(2, 2);
        metrics.record_failure();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                multiplications: 2,
                workers_spawned: 5,
                rows_computed: 9,
                failures: 1,
            }
        );
    }
}
