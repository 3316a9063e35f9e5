use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Result, TunerError};
use crate::models::ParameterPoint;
use crate::oracle::Oracle;

/// Configuration for the bounded exhaustive strategy.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Upper-bound latency, in microseconds.
    pub target_us: f64,
    /// Minimum latency change from the parent for a point to keep expanding;
    /// plateaus narrower than this become terminals.
    pub epsilon_us: f64,
    /// Optional per-knob upper bound on successor generation.
    pub bound: Option<ParameterPoint>,
}

impl SweepConfig {
    pub fn new(target_us: f64) -> Self {
        Self {
            target_us,
            epsilon_us: 0.1,
            bound: None,
        }
    }
}

/// Terminal frontier of a sweep run.
#[derive(Debug, Clone)]
pub struct SweepResults {
    /// Every terminal point mapped to its own measured latency: the first
    /// point along each monotonic path whose latency crossed the target, or
    /// stalled within epsilon of its parent.
    pub terminals: HashMap<ParameterPoint, f64>,
    /// Largest sample measured strictly below the target anywhere in the
    /// traversal, with the point it came from.
    pub best_feasible: Option<(ParameterPoint, f64)>,
    pub oracle_calls: usize,
}

impl SweepResults {
    /// The reported best configuration: the measured point that came closest
    /// to the target from below.
    pub fn best_under_target(&self) -> Option<(ParameterPoint, f64)> {
        self.best_feasible
    }
}

/// Breadth-first traversal over the monotone successor lattice.
///
/// Each dequeued point is measured exactly once (the visited-set is updated
/// before enqueueing). A point whose sample is below the target and differs
/// from its parent's by at least epsilon expands; every other point is a
/// terminal, recorded with its sample.
pub fn sweep<O: Oracle>(
    start: ParameterPoint,
    oracle: &mut O,
    config: &SweepConfig,
) -> Result<SweepResults> {
    start.validate()?;
    if config.target_us <= 0.0 {
        return Err(TunerError::InvalidParameter(format!(
            "target latency must be > 0, got {}",
            config.target_us
        )));
    }
    if config.epsilon_us < 0.0 {
        return Err(TunerError::InvalidParameter(format!(
            "epsilon must be >= 0, got {}",
            config.epsilon_us
        )));
    }
    validate_bound(&start, config.bound.as_ref())?;

    let mut queue: VecDeque<(ParameterPoint, Option<f64>)> = VecDeque::new();
    let mut visited: HashSet<ParameterPoint> = HashSet::new();
    let mut terminals: HashMap<ParameterPoint, f64> = HashMap::new();
    let mut best_feasible: Option<(ParameterPoint, f64)> = None;
    let mut oracle_calls = 0usize;

    visited.insert(start);
    queue.push_back((start, None));

    while let Some((point, parent_latency)) = queue.pop_front() {
        let sample = oracle.measure(&point)?;
        oracle_calls += 1;

        if sample < config.target_us && best_feasible.is_none_or(|(_, b)| sample > b) {
            best_feasible = Some((point, sample));
        }

        let expands = sample < config.target_us
            && parent_latency.is_none_or(|p| (sample - p).abs() >= config.epsilon_us);

        if expands {
            for succ in point.successors(config.bound.as_ref()) {
                if visited.insert(succ) {
                    queue.push_back((succ, Some(sample)));
                }
            }
        } else {
            terminals.insert(point, sample);
        }
    }

    Ok(SweepResults {
        terminals,
        best_feasible,
        oracle_calls,
    })
}

/// Full measurement grid of a bounded profile run.
#[derive(Debug, Clone)]
pub struct ProfileResults {
    /// Every reachable point within the bound, mapped to its latency.
    pub measurements: HashMap<ParameterPoint, f64>,
    pub oracle_calls: usize,
}

/// Measure every point of the bounded successor lattice, with no target.
pub fn profile<O: Oracle>(
    start: ParameterPoint,
    bound: &ParameterPoint,
    oracle: &mut O,
) -> Result<ProfileResults> {
    start.validate()?;
    validate_bound(&start, Some(bound))?;

    let mut queue: VecDeque<ParameterPoint> = VecDeque::new();
    let mut visited: HashSet<ParameterPoint> = HashSet::new();
    let mut measurements: HashMap<ParameterPoint, f64> = HashMap::new();
    let mut oracle_calls = 0usize;

    visited.insert(start);
    queue.push_back(start);

    while let Some(point) = queue.pop_front() {
        let sample = oracle.measure(&point)?;
        oracle_calls += 1;
        measurements.insert(point, sample);

        for succ in point.successors(Some(bound)) {
            if visited.insert(succ) {
                queue.push_back(succ);
            }
        }
    }

    Ok(ProfileResults {
        measurements,
        oracle_calls,
    })
}

fn validate_bound(start: &ParameterPoint, bound: Option<&ParameterPoint>) -> Result<()> {
    if let Some(bound) = bound {
        bound.validate()?;
        if bound.family() != start.family() {
            return Err(TunerError::InvalidParameter(format!(
                "bound {} does not match start family {}",
                bound.key(),
                start.family()
            )));
        }
    }
    Ok(())
}
