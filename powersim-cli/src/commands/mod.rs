pub mod curve;
pub mod four_sample;
pub mod independence;
pub mod three_sample;
pub mod two_sample;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use powersim_core::power::{PowerAggregation, PowerConfig, PowerEstimate};
use powersim_core::stats::TestKind;
use powersim_core::Workers;

/// Options shared by every power subcommand.
#[derive(Args)]
pub struct CommonArgs {
    /// Test statistic: dcorr or mean_difference
    #[arg(long, default_value = "dcorr")]
    test: String,

    /// Significance level
    #[arg(long, default_value = "0.05")]
    alpha: f64,

    /// Number of repetitions
    #[arg(long, default_value = "1000")]
    reps: usize,

    /// Random seed (omit for a non-reproducible run)
    #[arg(long)]
    seed: Option<u64>,

    /// Aggregation: smoothed or floored_raw (default depends on the subcommand)
    #[arg(long)]
    aggregation: Option<String>,

    /// Write the full result as JSON to this path
    #[arg(long)]
    json: Option<String>,
}

impl CommonArgs {
    pub fn test_kind(&self) -> Result<TestKind> {
        Ok(self.test.parse()?)
    }

    pub fn power_config(&self, workers: Workers) -> Result<PowerConfig> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            bail!("--alpha must lie in (0, 1), got {}", self.alpha);
        }
        if self.reps == 0 {
            bail!("--reps must be positive");
        }
        let aggregation = self
            .aggregation
            .as_deref()
            .map(str::parse::<PowerAggregation>)
            .transpose()?;
        Ok(PowerConfig {
            alpha: self.alpha,
            reps: self.reps,
            workers,
            seed: self.seed,
            aggregation,
            ..Default::default()
        })
    }

    /// Print the estimate and write it as JSON when requested.
    pub fn report(&self, estimate: &PowerEstimate) -> Result<()> {
        println!("Test: {}", self.test);
        println!("Alpha: {}", estimate.alpha);
        println!("Repetitions: {}", estimate.reps);
        println!(
            "Cutoff: {:.6} (index {})",
            estimate.cutoff, estimate.cutoff_index
        );
        println!("Rejections: {}", estimate.count);
        println!("Empirical power: {:.4}", estimate.power);
        self.write_json(estimate)
    }

    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(path) = &self.json {
            write_json(Path::new(path), value)?;
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Parse a comma-separated list, ignoring blank entries.
pub fn parse_list<T>(s: &str) -> Result<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse::<T>().with_context(|| format!("Invalid value {:?}", v)))
        .collect()
}
