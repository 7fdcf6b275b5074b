//! Parallel dense integer matrix multiplication.
//!
//! Output rows are split into contiguous, disjoint ranges up front and each
//! range is handed to its own scoped worker thread. Workers only ever hold a
//! mutable borrow of their own rows, so no locking is needed while computing.

pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use math::{multiply_range, partition, Element, Matrix, RowRange};
pub use prelude::{MatrixError, MatrixResult, Multiplier};
pub use processing::{multiply_parallel, ParallelMultiplier, SequentialMultiplier};
