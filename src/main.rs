use std::path::PathBuf;

use clap::Parser;

use kdf_cost_tuner_rs::cli::{Cli, Command, parse_divisors, parse_triple};
use kdf_cost_tuner_rs::error::Result;
use kdf_cost_tuner_rs::models::{KdfFamily, ParameterPoint};
use kdf_cost_tuner_rs::oracle::{AveragingOracle, ProcessOracle};
use kdf_cost_tuner_rs::output::{
    print_outcome, print_profile_summary, print_sweep_summary, write_best_json, write_csv,
};
use kdf_cost_tuner_rs::search::{
    HillClimbConfig, SearchOutcome, SweepConfig, hill_climb, profile, sweep,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tune {
            oracle,
            family,
            target,
            start,
            repeats,
            max_iterations,
            frontier_cap,
            seed,
            json,
        } => cmd_tune(
            oracle,
            family,
            target,
            start,
            repeats,
            max_iterations,
            frontier_cap,
            seed,
            json,
        ),
        Command::Sweep {
            oracle,
            family,
            target,
            start,
            bound,
            epsilon,
            repeats,
            csv,
            json,
        } => cmd_sweep(
            oracle, family, target, start, bound, epsilon, repeats, csv, json,
        ),
        Command::Profile {
            oracle,
            family,
            start,
            bound,
            repeats,
            csv,
        } => cmd_profile(oracle, family, start, bound, repeats, csv),
        Command::Schedule {
            oracle,
            family,
            workload,
            divisors,
            bound,
            epsilon,
            repeats,
        } => cmd_schedule(oracle, family, workload, divisors, bound, epsilon, repeats),
    }
}

fn start_point(family: KdfFamily, start: Option<&str>) -> Result<ParameterPoint> {
    match start {
        Some(s) => Ok(family.point(parse_triple(s)?)),
        None => Ok(family.default_start()),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_tune(
    oracle: PathBuf,
    family: KdfFamily,
    target: f64,
    start: Option<String>,
    repeats: u32,
    max_iterations: usize,
    frontier_cap: usize,
    seed: u64,
    json: Option<PathBuf>,
) -> Result<()> {
    let start = start_point(family, start.as_deref())?;
    let mut oracle = AveragingOracle::new(ProcessOracle::new(oracle), repeats)?;

    let mut config = HillClimbConfig::new(target);
    config.max_iterations = max_iterations;
    config.frontier_cap = frontier_cap;
    config.seed = seed;

    println!(
        "Tuning {} from {} toward {:.3} us ({} samples per point)",
        family, start, target, repeats
    );

    let report = hill_climb(start, &mut oracle, &config)?;
    print_outcome(&report, target);

    if let Some(path) = json {
        let best = match &report.outcome {
            SearchOutcome::Converged { point, latency_us } => Some((*point, *latency_us)),
            SearchOutcome::Exhausted { best } => *best,
        };
        match best {
            Some((point, latency)) => {
                write_best_json(&point, latency, target, &path)?;
                println!("Wrote best configuration to {:?}", path);
            }
            None => println!("No configuration to write to {:?}", path),
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sweep(
    oracle: PathBuf,
    family: KdfFamily,
    target: f64,
    start: Option<String>,
    bound: Option<String>,
    epsilon: f64,
    repeats: u32,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let start = start_point(family, start.as_deref())?;
    let mut oracle = AveragingOracle::new(ProcessOracle::new(oracle), repeats)?;

    let mut config = SweepConfig::new(target);
    config.epsilon_us = epsilon;
    config.bound = bound
        .as_deref()
        .map(|s| Ok::<_, kdf_cost_tuner_rs::TunerError>(family.point(parse_triple(s)?)))
        .transpose()?;

    println!(
        "Sweeping {} from {} toward {:.3} us ({} samples per point)",
        family, start, target, repeats
    );

    let results = sweep(start, &mut oracle, &config)?;
    print_sweep_summary(&results, target);

    if let Some(path) = csv {
        write_csv(&results.terminals, &path)?;
        println!("Wrote {} terminals to {:?}", results.terminals.len(), path);
    }

    if let Some(path) = json {
        match results.best_under_target() {
            Some((point, latency)) => {
                write_best_json(&point, latency, target, &path)?;
                println!("Wrote best configuration to {:?}", path);
            }
            None => println!("No configuration to write to {:?}", path),
        }
    }

    Ok(())
}

fn cmd_profile(
    oracle: PathBuf,
    family: KdfFamily,
    start: Option<String>,
    bound: String,
    repeats: u32,
    csv: Option<PathBuf>,
) -> Result<()> {
    let start = start_point(family, start.as_deref())?;
    let bound = family.point(parse_triple(&bound)?);
    let mut oracle = AveragingOracle::new(ProcessOracle::new(oracle), repeats)?;

    println!(
        "Profiling {} from {} up to {} ({} samples per point)",
        family, start, bound, repeats
    );

    let results = profile(start, &bound, &mut oracle)?;
    print_profile_summary(&results.measurements, results.oracle_calls);

    if let Some(path) = csv {
        write_csv(&results.measurements, &path)?;
        println!(
            "Wrote {} measurements to {:?}",
            results.measurements.len(),
            path
        );
    }

    Ok(())
}

fn cmd_schedule(
    oracle: PathBuf,
    family: KdfFamily,
    workload: f64,
    divisors: String,
    bound: Option<String>,
    epsilon: f64,
    repeats: u32,
) -> Result<()> {
    let divisors = parse_divisors(&divisors)?;
    let bound = bound
        .as_deref()
        .map(|s| Ok::<_, kdf_cost_tuner_rs::TunerError>(family.point(parse_triple(s)?)))
        .transpose()?;
    let start = family.default_start();
    let mut oracle = AveragingOracle::new(ProcessOracle::new(oracle), repeats)?;

    println!(
        "Scheduling {} targets from a {:.3} us workload budget",
        divisors.len(),
        workload
    );

    for divisor in divisors {
        let target = workload / divisor;

        let mut config = SweepConfig::new(target);
        config.epsilon_us = epsilon;
        config.bound = bound;

        let results = sweep(start, &mut oracle, &config)?;
        match results.best_under_target() {
            Some((point, latency)) => println!(
                "{} /{}: {} at {:.3} us (target {:.3} us)",
                family,
                divisor,
                point.key(),
                latency,
                target
            ),
            None => println!(
                "{} /{}: no feasible point under {:.3} us",
                family, divisor, target
            ),
        }
    }

    Ok(())
}
