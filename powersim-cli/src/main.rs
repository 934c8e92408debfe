//! powersim: empirical power of independence and k-sample tests.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use powersim_core::Workers;

#[derive(Parser)]
#[command(
    name = "powersim",
    version,
    about = "Permutation-based power estimation for independence and k-sample tests",
    long_about = "Simulates grouped samples, builds permutation null distributions and\n\
                   reports the empirical power of a test at a fixed significance level."
)]
struct Cli {
    /// Number of workers to run repetitions on (-1 uses all cores)
    #[arg(long, default_value = "1", global = true, allow_hyphen_values = true)]
    workers: i64,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Independence power under an unrotated simulator, optionally swept over n or p
    Independence(commands::independence::IndependenceArgs),

    /// Two-sample power under a rotated independence simulator
    TwoSample(commands::two_sample::TwoSampleArgs),

    /// Three-sample Gaussian power over effect size and mixture weight
    ThreeSample(commands::three_sample::ThreeSampleArgs),

    /// Four-sample two-way Gaussian power, optionally on distance matrices
    FourSample(commands::four_sample::FourSampleArgs),

    /// Two-sample power curve over sample size, dimension or angle
    Curve(commands::curve::CurveArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let workers = Workers::from_count(cli.workers)?;

    tracing::info!("powersim v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} workers", workers.threads());

    match cli.command {
        Commands::Independence(args) => commands::independence::run(args, workers),
        Commands::TwoSample(args) => commands::two_sample::run(args, workers),
        Commands::ThreeSample(args) => commands::three_sample::run(args, workers),
        Commands::FourSample(args) => commands::four_sample::run(args, workers),
        Commands::Curve(args) => commands::curve::run(args, workers),
    }
}
