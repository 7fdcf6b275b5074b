pub mod parallel;
pub mod sequential;

pub use parallel::{multiply_parallel, ParallelMultiplier, ThreadTask};
pub use sequential::SequentialMultiplier;
