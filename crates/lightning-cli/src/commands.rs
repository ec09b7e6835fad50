//! Subcommand handlers.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use lightning_core::{capabilities, DistanceMetric, Engine};

/// `lightning caps`
pub fn caps(json: bool) -> Result<()> {
    let caps = capabilities();
    if json {
        println!("{}", caps.to_json());
        return Ok(());
    }

    println!("{}", "SIMD Capabilities".bold().underline());
    println!("  {} {}", "Tier:".cyan(), caps.tier().name().green());
    println!("  {} {}", "Lanes:".cyan(), caps.lane_width());
    println!("  {} {}", "Arch:".cyan(), caps.arch());
    let features = if caps.features().is_empty() {
        "none".to_string()
    } else {
        caps.features().join(", ")
    };
    println!("  {} {}", "Features:".cyan(), features);
    let accelerated = if caps.is_accelerated() {
        "yes".green()
    } else {
        "no (scalar fallback)".yellow()
    };
    println!("  {} {}", "Accelerated:".cyan(), accelerated);
    println!("\n{caps}");
    Ok(())
}

/// `lightning distance`
pub fn distance(engine: &Engine, metric: DistanceMetric, a: &[f32], b: &[f32]) -> Result<()> {
    let d = engine
        .distance(metric, a, b)
        .with_context(|| format!("Cannot compute {metric} distance"))?;
    println!("{d}");
    Ok(())
}

/// `lightning batch`
pub fn batch(
    engine: &Engine,
    metric: DistanceMetric,
    query: &[f32],
    candidates_path: &Path,
    json: bool,
) -> Result<()> {
    let candidates = read_candidates(candidates_path)?;
    tracing::debug!(
        candidates = candidates.len(),
        dim = query.len(),
        %metric,
        "Running batch"
    );

    let distances = engine
        .batch()
        .batch(metric, query, &candidates)
        .with_context(|| format!("Batch {metric} over {} failed", candidates_path.display()))?;

    if json {
        println!("{}", serde_json::to_string(&distances)?);
    } else {
        for (i, d) in distances.iter().enumerate() {
            println!("{i}\t{d}");
        }
    }
    Ok(())
}

fn read_candidates(path: &Path) -> Result<Vec<Vec<f32>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of vectors", path.display()))
}
