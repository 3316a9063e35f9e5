use std::collections::HashMap;

use assert_float_eq::assert_float_absolute_eq;

use kdf_cost_tuner_rs::error::Result;
use kdf_cost_tuner_rs::models::ParameterPoint;
use kdf_cost_tuner_rs::oracle::{AveragingOracle, Oracle};
use kdf_cost_tuner_rs::search::{
    HillClimbConfig, SearchOutcome, SweepConfig, hill_climb, profile, sweep,
};

/// Deterministic argon2 stub: latency = t*10 + m*5 + d, with call counts.
struct LinearOracle {
    calls: HashMap<ParameterPoint, usize>,
}

impl LinearOracle {
    fn new() -> Self {
        Self {
            calls: HashMap::new(),
        }
    }

    fn latency(point: &ParameterPoint) -> f64 {
        let [t, m, d] = point.fields();
        f64::from(t) * 10.0 + f64::from(m) * 5.0 + f64::from(d)
    }
}

impl Oracle for LinearOracle {
    fn measure(&mut self, point: &ParameterPoint) -> Result<f64> {
        *self.calls.entry(*point).or_insert(0) += 1;
        Ok(Self::latency(point))
    }
}

/// The linear stub plus a deterministic wobble that alternates sign per call.
struct NoisyOracle {
    inner: LinearOracle,
    tick: u64,
}

impl Oracle for NoisyOracle {
    fn measure(&mut self, point: &ParameterPoint) -> Result<f64> {
        self.tick += 1;
        let wobble = if self.tick % 2 == 0 { 0.4 } else { -0.4 };
        Ok(self.inner.measure(point)? + wobble)
    }
}

#[test]
fn test_hill_climb_converges_between_20_and_target() {
    let mut oracle = LinearOracle::new();
    let config = HillClimbConfig::new(26.0);
    let report = hill_climb(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();

    match report.outcome {
        SearchOutcome::Converged { point, latency_us } => {
            assert!(
                (20.0..26.0).contains(&latency_us),
                "converged at {latency_us}"
            );
            assert_eq!(LinearOracle::latency(&point), latency_us);
        }
        other => panic!("expected convergence, got {other:?}"),
    }
}

#[test]
fn test_hill_climb_result_never_reaches_target_even_with_noise() {
    let mut oracle = NoisyOracle {
        inner: LinearOracle::new(),
        tick: 0,
    };
    let mut config = HillClimbConfig::new(26.0);
    config.max_iterations = 30;
    let report = hill_climb(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();

    let reported = match report.outcome {
        SearchOutcome::Converged { latency_us, .. } => Some(latency_us),
        SearchOutcome::Exhausted { best } => best.map(|(_, latency)| latency),
    };
    if let Some(latency) = reported {
        assert!(latency < 26.0, "reported {latency} at or above the target");
    }
}

#[test]
fn test_hill_climb_memoizes_candidate_evaluations() {
    let mut oracle = LinearOracle::new();
    let config = HillClimbConfig::new(26.0);
    hill_climb(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();

    // Only the current point is ever re-measured, and a point at or above
    // the target can never become current.
    for (point, count) in &oracle.calls {
        if LinearOracle::latency(point) >= 26.0 {
            assert_eq!(*count, 1, "{} re-measured", point.key());
        }
    }
}

#[test]
fn test_bounded_sweep_terminates_within_bound() {
    let mut oracle = LinearOracle::new();
    let mut config = SweepConfig::new(80.0);
    config.bound = Some(ParameterPoint::argon2(10, 10, 2));
    let results = sweep(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();

    assert!(!results.terminals.is_empty());
    for point in results.terminals.keys() {
        let [t, m, d] = point.fields();
        assert!(t <= 10 && m <= 10 && d <= 2, "{} out of bound", point.key());
    }
}

#[test]
fn test_sweep_each_point_measured_at_most_once() {
    let mut oracle = LinearOracle::new();
    let config = SweepConfig::new(30.0);
    sweep(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();
    assert!(oracle.calls.values().all(|&count| count == 1));
}

#[test]
fn test_profile_measures_full_grid_once() {
    let mut oracle = LinearOracle::new();
    let bound = ParameterPoint::argon2(10, 10, 2);
    let results = profile(ParameterPoint::argon2(1, 1, 1), &bound, &mut oracle).unwrap();

    assert_eq!(results.measurements.len(), 200);
    assert_eq!(results.oracle_calls, 200);
    assert!(oracle.calls.values().all(|&count| count == 1));
}

#[test]
fn test_averaged_search_matches_unaveraged_on_deterministic_oracle() {
    let plain = {
        let mut oracle = LinearOracle::new();
        let config = HillClimbConfig::new(26.0);
        hill_climb(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap()
    };
    let averaged = {
        let mut oracle = AveragingOracle::new(LinearOracle::new(), 3).unwrap();
        let config = HillClimbConfig::new(26.0);
        hill_climb(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap()
    };

    match (plain.outcome, averaged.outcome) {
        (
            SearchOutcome::Converged {
                point: a,
                latency_us: la,
            },
            SearchOutcome::Converged {
                point: b,
                latency_us: lb,
            },
        ) => {
            assert_eq!(a, b);
            assert_eq!(la, lb);
        }
        (a, b) => panic!("expected both runs to converge, got {a:?} / {b:?}"),
    }
}

#[test]
fn test_sweep_best_is_closest_feasible() {
    let mut oracle = LinearOracle::new();
    let config = SweepConfig::new(30.0);
    let results = sweep(ParameterPoint::argon2(1, 1, 1), &mut oracle, &config).unwrap();

    let (point, latency) = results.best_under_target().unwrap();
    assert_float_absolute_eq!(latency, 29.0);
    assert_eq!(point, ParameterPoint::argon2(2, 1, 4));

    // every measured feasible sample is at most the reported best
    for (measured, &count) in &oracle.calls {
        assert_eq!(count, 1);
        let sample = LinearOracle::latency(measured);
        if sample < 30.0 {
            assert!(sample <= latency);
        }
    }
}
