use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, TunerError};
use crate::models::ParameterPoint;
use crate::oracle::Oracle;

/// Measures a point by running the external benchmark executable.
///
/// The executable is invoked as `<program> <family-tag> <f1> <f2> <f3>` and
/// must print a single elapsed-time value in nanoseconds on stdout. Launch
/// failure, an abnormal exit, or unparseable output is a fatal
/// [`TunerError::Oracle`] for that call; the search never retries.
pub struct ProcessOracle {
    program: PathBuf,
}

impl ProcessOracle {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Oracle for ProcessOracle {
    fn measure(&mut self, point: &ParameterPoint) -> Result<f64> {
        let [a, b, c] = point.fields();
        let output = Command::new(&self.program)
            .arg(point.family_tag())
            .arg(a.to_string())
            .arg(b.to_string())
            .arg(c.to_string())
            .output()
            .map_err(|e| {
                TunerError::Oracle(format!(
                    "failed to launch {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(TunerError::Oracle(format!(
                "{} exited with {} for {}",
                self.program.display(),
                output.status,
                point.key()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = stdout.split_whitespace().next().ok_or_else(|| {
            TunerError::Oracle(format!(
                "{} produced no output for {}",
                self.program.display(),
                point.key()
            ))
        })?;

        let nanos: f64 = token.parse().map_err(|_| {
            TunerError::Oracle(format!(
                "{} produced non-numeric output {:?} for {}",
                self.program.display(),
                token,
                point.key()
            ))
        })?;

        Ok(nanos / 1000.0)
    }
}
