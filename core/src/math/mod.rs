pub mod kernel;
pub mod matrix;
pub mod partition;

pub use kernel::multiply_range;
pub use matrix::{Element, Matrix};
pub use partition::{partition, RowRange};
