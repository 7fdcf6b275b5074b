pub mod metrics;
pub mod timing;

pub use metrics::{MetricsRecorder, MetricsSnapshot};
pub use timing::timed;
