use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, TunerError};
use crate::models::ParameterPoint;
use crate::oracle::Oracle;

/// Configuration for the hill-climbing strategy.
#[derive(Debug, Clone)]
pub struct HillClimbConfig {
    /// Upper-bound latency the search approaches from below, in microseconds.
    pub target_us: f64,
    /// Iterations allowed before the run is declared exhausted.
    pub max_iterations: usize,
    /// Cap on the candidate frontier per iteration, bounding oracle calls.
    pub frontier_cap: usize,
    /// Seed for the frontier shuffle, for reproducible runs.
    pub seed: u64,
}

impl HillClimbConfig {
    pub fn new(target_us: f64) -> Self {
        Self {
            target_us,
            max_iterations: 200,
            frontier_cap: 100,
            seed: 123,
        }
    }
}

/// Final state of a hill-climbing run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The search settled on a point no unvisited candidate could beat.
    Converged {
        point: ParameterPoint,
        latency_us: f64,
    },
    /// The iteration cap elapsed. `best` is the incumbent, if any candidate
    /// ever measured under the target.
    Exhausted {
        best: Option<(ParameterPoint, f64)>,
    },
}

/// Outcome plus run accounting, returned to the driver.
#[derive(Debug, Clone)]
pub struct HillClimbReport {
    pub outcome: SearchOutcome,
    pub oracle_calls: usize,
    pub iterations: usize,
}

/// Greedy noisy ascent toward the largest latency strictly below the target.
///
/// Each iteration measures a shuffled, capped frontier of the current point's
/// neighbors plus the carried-over second-order neighbors generated while
/// measuring the previous frontier (one-step lookahead). The visited-set
/// ensures no candidate is measured twice; the current point itself is
/// re-measured every iteration because the oracle is noisy. Comparisons are
/// strictly greater throughout, so equal latencies never displace an
/// incumbent and the earliest-found point wins ties.
pub fn hill_climb<O: Oracle>(
    start: ParameterPoint,
    oracle: &mut O,
    config: &HillClimbConfig,
) -> Result<HillClimbReport> {
    start.validate()?;
    if config.target_us <= 0.0 {
        return Err(TunerError::InvalidParameter(format!(
            "target latency must be > 0, got {}",
            config.target_us
        )));
    }
    if config.frontier_cap < 1 {
        return Err(TunerError::InvalidParameter(
            "frontier cap must be >= 1".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut seen: HashSet<ParameterPoint> = HashSet::new();

    let mut current = start;
    let mut current_latency: Option<f64> = None;
    let mut carry: Vec<ParameterPoint> = Vec::new();
    let mut oracle_calls = 0usize;

    for iteration in 1..=config.max_iterations {
        let mut frontier = current.neighbors();
        frontier.append(&mut carry);
        frontier.shuffle(&mut rng);
        frontier.truncate(config.frontier_cap);

        let mut best: Option<(ParameterPoint, f64)> = None;

        for candidate in frontier {
            if !seen.insert(candidate) {
                continue;
            }
            let sample = oracle.measure(&candidate)?;
            oracle_calls += 1;
            carry.extend(candidate.neighbors());

            if sample < config.target_us && best.is_none_or(|(_, b)| sample > b) {
                best = Some((candidate, sample));
            }
        }

        let remeasured = oracle.measure(&current)?;
        oracle_calls += 1;

        if remeasured < config.target_us && best.is_none_or(|(_, b)| remeasured > b) {
            return Ok(HillClimbReport {
                outcome: SearchOutcome::Converged {
                    point: current,
                    latency_us: remeasured,
                },
                oracle_calls,
                iterations: iteration,
            });
        }

        if let Some((point, latency)) = best {
            if current_latency.is_none_or(|c| latency > c) {
                current = point;
                current_latency = Some(latency);
                continue;
            }
        }
        if remeasured < config.target_us && current_latency.is_none_or(|c| remeasured > c) {
            current_latency = Some(remeasured);
        }
    }

    Ok(HillClimbReport {
        outcome: SearchOutcome::Exhausted {
            best: current_latency.map(|latency| (current, latency)),
        },
        oracle_calls,
        iterations: config.max_iterations,
    })
}
