use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::{Result, TunerError};
use crate::models::KdfFamily;

/// KdfTuner — searches KDF cost parameters for a target latency budget.
#[derive(Parser, Debug)]
#[command(name = "kdf-tuner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hill-climb toward the largest latency under the target.
    Tune {
        /// Path to the measurement oracle executable.
        #[arg(long)]
        oracle: PathBuf,

        /// KDF family to tune.
        #[arg(long, default_value = "argon2")]
        family: KdfFamily,

        /// Target latency in microseconds.
        #[arg(long)]
        target: f64,

        /// Starting point as three comma-separated knobs (default 1,1,1).
        #[arg(long)]
        start: Option<String>,

        /// Oracle samples averaged per point.
        #[arg(long, default_value = "5")]
        repeats: u32,

        /// Iteration cap before the run is declared exhausted.
        #[arg(long, default_value = "200")]
        max_iterations: usize,

        /// Candidate cap per iteration.
        #[arg(long, default_value = "100")]
        frontier_cap: usize,

        /// Seed for the frontier shuffle.
        #[arg(long, default_value = "123")]
        seed: u64,

        /// Write the best configuration to this JSON file.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Expand successors breadth-first until latency crosses the target.
    Sweep {
        /// Path to the measurement oracle executable.
        #[arg(long)]
        oracle: PathBuf,

        /// KDF family to sweep.
        #[arg(long, default_value = "argon2")]
        family: KdfFamily,

        /// Target latency in microseconds.
        #[arg(long)]
        target: f64,

        /// Starting point as three comma-separated knobs (default 1,1,1).
        #[arg(long)]
        start: Option<String>,

        /// Per-knob upper bound as three comma-separated values.
        #[arg(long)]
        bound: Option<String>,

        /// Plateau cutoff in microseconds.
        #[arg(long, default_value = "0.1")]
        epsilon: f64,

        /// Oracle samples averaged per point.
        #[arg(long, default_value = "5")]
        repeats: u32,

        /// Write all terminal points to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the best configuration to this JSON file.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Measure every point of a bounded parameter grid.
    Profile {
        /// Path to the measurement oracle executable.
        #[arg(long)]
        oracle: PathBuf,

        /// KDF family to profile.
        #[arg(long, default_value = "argon2")]
        family: KdfFamily,

        /// Starting point as three comma-separated knobs (default 1,1,1).
        #[arg(long)]
        start: Option<String>,

        /// Per-knob upper bound as three comma-separated values.
        #[arg(long)]
        bound: String,

        /// Oracle samples averaged per point.
        #[arg(long, default_value = "1")]
        repeats: u32,

        /// Write the measured grid to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Sweep a batch of targets derived from a workload budget and divisors.
    Schedule {
        /// Path to the measurement oracle executable.
        #[arg(long)]
        oracle: PathBuf,

        /// KDF family to tune.
        #[arg(long, default_value = "argon2")]
        family: KdfFamily,

        /// Total workload latency budget in microseconds.
        #[arg(long)]
        workload: f64,

        /// Concurrency divisors, comma-separated; each run targets
        /// workload / divisor.
        #[arg(long, default_value = "2,4,8,16,32,64,128")]
        divisors: String,

        /// Per-knob upper bound as three comma-separated values.
        #[arg(long)]
        bound: Option<String>,

        /// Plateau cutoff in microseconds.
        #[arg(long, default_value = "0.1")]
        epsilon: f64,

        /// Oracle samples averaged per point.
        #[arg(long, default_value = "5")]
        repeats: u32,
    },
}

/// Parse a comma-separated knob triple like "3,12,1".
pub fn parse_triple(s: &str) -> Result<[u32; 3]> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| TunerError::InvalidParameter(format!("bad knob triple: {s:?}")))?;

    match parts.as_slice() {
        &[a, b, c] => Ok([a, b, c]),
        _ => Err(TunerError::InvalidParameter(format!(
            "expected three comma-separated knobs, got {s:?}"
        ))),
    }
}

/// Parse a comma-separated divisor list like "2,4,8".
pub fn parse_divisors(s: &str) -> Result<Vec<f64>> {
    let divisors: Vec<f64> = s
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| TunerError::InvalidParameter(format!("bad divisor list: {s:?}")))?;

    if divisors.is_empty() || divisors.iter().any(|&d| d <= 0.0) {
        return Err(TunerError::InvalidParameter(format!(
            "divisors must be positive: {s:?}"
        )));
    }
    Ok(divisors)
}
