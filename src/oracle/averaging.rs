use crate::error::{Result, TunerError};
use crate::models::ParameterPoint;
use crate::oracle::Oracle;

/// Default number of repeated measurements averaged per point.
pub const DEFAULT_REPEATS: u32 = 5;

/// Averages `repeats` samples from an inner oracle to damp measurement noise.
pub struct AveragingOracle<O> {
    inner: O,
    repeats: u32,
}

impl<O: Oracle> AveragingOracle<O> {
    pub fn new(inner: O, repeats: u32) -> Result<Self> {
        if repeats < 1 {
            return Err(TunerError::InvalidParameter(
                "repeat count must be >= 1".to_string(),
            ));
        }
        Ok(Self { inner, repeats })
    }
}

impl<O: Oracle> Oracle for AveragingOracle<O> {
    fn measure(&mut self, point: &ParameterPoint) -> Result<f64> {
        let mut total = 0.0;
        for _ in 0..self.repeats {
            total += self.inner.measure(point)?;
        }
        Ok(total / f64::from(self.repeats))
    }
}
