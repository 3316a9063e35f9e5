use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::ParameterPoint;
use crate::search::{HillClimbReport, SearchOutcome, SweepResults};

/// Truncate a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write a measured point mapping to a CSV file, highest latency first.
pub fn write_csv(results: &HashMap<ParameterPoint, f64>, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["key", "family", "f1", "f2", "f3", "latency_us"])?;

    let mut rows: Vec<(&ParameterPoint, &f64)> = results.iter().collect();
    rows.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (point, latency) in rows {
        let [a, b, c] = point.fields();
        wtr.write_record([
            point.key(),
            point.family().to_string(),
            a.to_string(),
            b.to_string(),
            c.to_string(),
            format!("{:.3}", latency),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the best configuration to a JSON file with truncated floats.
pub fn write_best_json(
    point: &ParameterPoint,
    latency_us: f64,
    target_us: f64,
    path: &Path,
) -> Result<()> {
    let json = serde_json::json!({
        "point": point,
        "key": point.key(),
        "latency_us": truncate(latency_us, 3),
        "target_us": truncate(target_us, 3),
        "headroom_us": truncate(target_us - latency_us, 3),
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

/// Print a hill-climbing outcome to stdout.
pub fn print_outcome(report: &HillClimbReport, target_us: f64) {
    println!(
        "\n=== Hill climb: {} iterations, {} oracle calls ===\n",
        report.iterations, report.oracle_calls
    );

    match &report.outcome {
        SearchOutcome::Converged { point, latency_us } => {
            println!("Converged: {}  [{}]", point, point.key());
            println!(
                "Latency:   {:.3} us  (target {:.3} us, headroom {:.3} us)",
                latency_us,
                target_us,
                target_us - latency_us
            );
        }
        SearchOutcome::Exhausted {
            best: Some((point, latency_us)),
        } => {
            println!("Iteration cap reached before convergence.");
            println!("Best so far: {}  [{}]", point, point.key());
            println!(
                "Latency:     {:.3} us  (target {:.3} us)",
                latency_us, target_us
            );
        }
        SearchOutcome::Exhausted { best: None } => {
            println!("Iteration cap reached; no point measured under the target.");
        }
    }
}

/// Print a sweep summary to stdout.
pub fn print_sweep_summary(results: &SweepResults, target_us: f64) {
    println!(
        "\n=== Sweep: {} terminals, {} oracle calls ===\n",
        results.terminals.len(),
        results.oracle_calls
    );

    match results.best_under_target() {
        Some((point, latency_us)) => {
            println!("Best under target: {}  [{}]", point, point.key());
            println!(
                "Latency:           {:.3} us  (target {:.3} us, headroom {:.3} us)",
                latency_us,
                target_us,
                target_us - latency_us
            );
        }
        None => {
            println!(
                "No point measured under the target of {:.3} us.",
                target_us
            );
        }
    }
}

/// Print a profile summary to stdout.
pub fn print_profile_summary(measurements: &HashMap<ParameterPoint, f64>, oracle_calls: usize) {
    println!(
        "\n=== Profile: {} points, {} oracle calls ===\n",
        measurements.len(),
        oracle_calls
    );

    let fastest = measurements
        .iter()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));
    let slowest = measurements
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let (Some((fast_point, fast)), Some((slow_point, slow))) = (fastest, slowest) {
        println!("Fastest: {:.3} us  [{}]", fast, fast_point.key());
        println!("Slowest: {:.3} us  [{}]", slow, slow_point.key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_one_row_per_point() {
        let mut results = HashMap::new();
        results.insert(ParameterPoint::argon2(1, 1, 1), 16.0);
        results.insert(ParameterPoint::argon2(2, 1, 1), 26.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_csv(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "key,family,f1,f2,f3,latency_us");
        // sorted highest latency first
        assert!(lines[1].starts_with("ARGON2(2,1,1)"));
    }

    #[test]
    fn test_write_best_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best.json");
        let point = ParameterPoint::scrypt(64, 8, 1);
        write_best_json(&point, 1234.5678, 1500.0, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["key"], "scrypt(64,8,1)");
        assert_eq!(value["latency_us"], 1234.568);
        assert_eq!(value["target_us"], 1500.0);
        assert_eq!(value["point"]["family"], "scrypt");
        assert_eq!(value["point"]["cost"], 64);
    }
}
