//! Example: Score several baseline fits of one spectrum in parallel
//!
//! Builds a synthetic Raman-like spectrum, derives corrected signals from a
//! range of candidate baselines and prints the scores as JSON.
//!
//! Run with `RUST_LOG=info` to see the penalty table of each fit.

use is_score::{score_spectrum, ScoreConfig, ScoreOutcome};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Serialize)]
struct FitScore {
    name: String,
    score: f64,
    total_penalty: Option<f64>,
    error: Option<String>,
}

fn gaussian(x: f64, center: f64, width: f64, amplitude: f64) -> f64 {
    amplitude * (-((x - center) * (x - center)) / (2.0 * width * width)).exp()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let n = 800;
    let axis: Vec<f64> = (0..n).map(|i| 400.0 + 2.0 * i as f64).collect();
    let background: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64 / n as f64;
            0.3 + 0.5 * x - 0.25 * x * x
        })
        .collect();
    let raw: Vec<f64> = (0..n)
        .map(|i| {
            let x = i as f64;
            background[i] + gaussian(x, 180.0, 9.0, 1.0) + gaussian(x, 450.0, 14.0, 0.5)
                + gaussian(x, 620.0, 6.0, 0.7)
                - gaussian(x, 330.0, 7.0, 0.15)
        })
        .collect();

    let candidates: Vec<(String, Vec<f64>)> = vec![
        ("exact".to_string(), background.iter().map(|b| b - 0.001).collect()),
        ("offset_low".to_string(), background.iter().map(|b| b - 0.1).collect()),
        ("offset_high".to_string(), background.iter().map(|b| b + 0.1).collect()),
        ("linear".to_string(), (0..n).map(|i| 0.3 + 0.25 * i as f64 / n as f64).collect()),
        (
            "overfit".to_string(),
            raw.iter()
                .zip(&background)
                .map(|(r, b)| b + 0.9 * (r - b))
                .collect(),
        ),
    ];

    println!("Scoring {} candidate baselines...", candidates.len());

    let config = ScoreConfig::default();
    let scores: Vec<FitScore> = candidates
        .par_iter()
        .map(|(name, baseline)| {
            let corrected: Vec<f64> = raw.iter().zip(baseline).map(|(r, b)| r - b).collect();
            match score_spectrum(&raw, &corrected, &axis, &config) {
                Ok(ScoreOutcome::Scored(report)) => FitScore {
                    name: name.clone(),
                    score: report.score,
                    total_penalty: Some(report.penalties.total()),
                    error: None,
                },
                Ok(outcome @ ScoreOutcome::InvalidInput) => FitScore {
                    name: name.clone(),
                    score: outcome.score(),
                    total_penalty: None,
                    error: Some("invalid input".to_string()),
                },
                Err(e) => FitScore {
                    name: name.clone(),
                    score: f64::NAN,
                    total_penalty: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&scores)?);

    Ok(())
}
