pub mod averaging;
pub mod process;

pub use averaging::{AveragingOracle, DEFAULT_REPEATS};
pub use process::ProcessOracle;

use crate::error::Result;
use crate::models::ParameterPoint;

/// A latency measurement source.
///
/// Repeated calls with the same point may return different samples
/// (measurement noise); callers must never assume determinism.
pub trait Oracle {
    /// Measure one latency sample for `point`, in microseconds.
    fn measure(&mut self, point: &ParameterPoint) -> Result<f64>;
}
