use crate::math::kernel::multiply_rows;
use crate::math::matrix::{Element, Matrix};
use crate::math::partition::{partition, RowRange};
use crate::prelude::{check_dimensions, MatrixError, MatrixResult, Multiplier};
use crate::telemetry::metrics::MetricsRecorder;
use log::{debug, info, warn};
use std::any::Any;
use std::thread;

/// Everything one worker needs: its rows, the shared operands, and an
/// exclusive borrow of exactly its slice of the output buffer.
pub struct ThreadTask<'a> {
    worker: usize,
    range: RowRange,
    lhs: &'a Matrix,
    rhs: &'a Matrix,
    rows: &'a mut [Element],
}

impl ThreadTask<'_> {
    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn range(&self) -> RowRange {
        self.range
    }

    fn run(self) -> MatrixResult<()> {
        debug!(
            "worker {} computing rows {:?}..{:?}",
            self.worker,
            self.range.start(),
            self.range.end_inclusive()
        );
        multiply_rows(self.lhs, self.rhs, self.range, self.rows)
    }
}

/// Carves `out` into one task per non-empty range.
///
/// Ranges must tile the rows in order; anything else is rejected before a
/// single worker is spawned.
fn build_tasks<'a>(
    lhs: &'a Matrix,
    rhs: &'a Matrix,
    ranges: &[RowRange],
    out: &'a mut [Element],
) -> MatrixResult<Vec<ThreadTask<'a>>> {
    let width = rhs.width();
    let mut rest = out;
    let mut next_row = 0;
    let mut tasks = Vec::with_capacity(ranges.len());

    for (worker, &range) in ranges.iter().enumerate() {
        if range.start() != next_row {
            return Err(MatrixError::InvalidArgument(format!(
                "range {:?} for worker {} does not start at row {}",
                range, worker, next_row
            )));
        }
        next_row = range.end_exclusive();
        if range.is_empty() {
            continue;
        }
        let len = range.len() * width;
        if len > rest.len() {
            return Err(MatrixError::InvalidArgument(format!(
                "range {:?} for worker {} runs past the result",
                range, worker
            )));
        }
        let (rows, tail) = std::mem::take(&mut rest).split_at_mut(len);
        rest = tail;
        tasks.push(ThreadTask {
            worker,
            range,
            lhs,
            rhs,
            rows,
        });
    }

    if !rest.is_empty() {
        return Err(MatrixError::InvalidArgument(format!(
            "ranges cover {} rows, result has more",
            next_row
        )));
    }
    Ok(tasks)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Spawns one scoped thread per task and joins all of them.
///
/// Every worker is joined even when an earlier one failed; the first failure
/// in worker order is returned.
fn run_tasks(tasks: Vec<ThreadTask<'_>>) -> MatrixResult<()> {
    let outcomes: Vec<MatrixResult<()>> = thread::scope(|scope| {
        let handles: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let worker = task.worker;
                let handle = thread::Builder::new()
                    .name(format!("matmul-worker-{}", worker))
                    .spawn_scoped(scope, move || task.run());
                (worker, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(worker, handle)| match handle {
                Ok(handle) => match handle.join() {
                    Ok(outcome) => outcome,
                    Err(payload) => Err(MatrixError::WorkerFailed {
                        worker,
                        reason: panic_reason(payload.as_ref()),
                    }),
                },
                Err(err) => Err(MatrixError::WorkerFailed {
                    worker,
                    reason: format!("spawn failed: {}", err),
                }),
            })
            .collect()
    });

    outcomes.into_iter().collect()
}

/// Multiplies and reports how many workers actually ran.
fn multiply_counting(
    lhs: &Matrix,
    rhs: &Matrix,
    num_threads: usize,
) -> MatrixResult<(Matrix, usize)> {
    if num_threads == 0 {
        return Err(MatrixError::InvalidArgument(
            "thread count must be at least 1".into(),
        ));
    }
    check_dimensions(lhs, rhs)?;
    if num_threads > lhs.height() {
        warn!(
            "{} threads requested for {} rows; {} will stay idle",
            num_threads,
            lhs.height(),
            num_threads - lhs.height()
        );
    }

    // Threads past the row count would only receive empty ranges.
    let ranges = partition(lhs.height(), num_threads.min(lhs.height()))?;
    let mut result = Matrix::new(rhs.width(), lhs.height())?;
    let tasks = build_tasks(lhs, rhs, &ranges, result.as_mut_slice())?;
    let workers = tasks.len();
    run_tasks(tasks)?;

    info!(
        "multiplied {}x{} by {}x{} on {} workers",
        lhs.height(),
        lhs.width(),
        rhs.height(),
        rhs.width(),
        workers
    );
    Ok((result, workers))
}

/// Computes `lhs * rhs` with output rows split across `num_threads` workers.
///
/// Fails with `DimensionMismatch` before allocating anything when
/// `lhs.width() != rhs.height()`. There is no timeout: a worker that never
/// returns blocks the call forever.
pub fn multiply_parallel(lhs: &Matrix, rhs: &Matrix, num_threads: usize) -> MatrixResult<Matrix> {
    multiply_counting(lhs, rhs, num_threads).map(|(result, _)| result)
}

/// Fixed-width parallel multiplier that keeps running counters.
pub struct ParallelMultiplier {
    threads: usize,
    metrics: MetricsRecorder,
}

impl ParallelMultiplier {
    pub fn new(threads: usize) -> MatrixResult<Self> {
        if threads == 0 {
            return Err(MatrixError::InvalidArgument(
                "thread count must be at least 1".into(),
            ));
        }
        Ok(Self {
            threads,
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}

impl Multiplier for ParallelMultiplier {
    fn multiply(&self, lhs: &Matrix, rhs: &Matrix) -> MatrixResult<Matrix> {
        match multiply_counting(lhs, rhs, self.threads) {
            Ok((result, workers)) => {
                self.metrics.record_multiplication(workers, result.height());
                Ok(result)
            }
            Err(err) => {
                self.metrics.record_failure();
                Err(err)
            }
        }
    }
}
