//! Three-sample Gaussian power over effect size and mixture weight.
//!
//! powersim three-sample --epsilon 1 --weight 0 --case 3 --n 100 ...

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use powersim_core::power::{power_3samp_epsweight_estimate, ThreeSampleParams};
use powersim_core::Workers;

use super::CommonArgs;

#[derive(Args)]
pub struct ThreeSampleArgs {
    /// Observations per group
    #[arg(long, default_value = "100")]
    n: usize,

    /// Effect size
    #[arg(long, default_value = "1")]
    epsilon: f64,

    /// Mixture weight, in [0, 1]
    #[arg(long, default_value = "0")]
    weight: f64,

    /// Effect pattern (1-5)
    #[arg(long, default_value = "1")]
    case: u8,

    /// Dimension
    #[arg(long, default_value = "2")]
    d: usize,

    /// Standard deviation of each coordinate
    #[arg(long, default_value = "1")]
    sd: f64,

    #[command(flatten)]
    common: CommonArgs,
}

pub fn run(args: ThreeSampleArgs, workers: Workers) -> Result<()> {
    if !(1..=5).contains(&args.case) {
        bail!("--case must be between 1 and 5, got {}", args.case);
    }
    let params = ThreeSampleParams {
        n: args.n,
        epsilon: args.epsilon,
        weight: args.weight,
        case: args.case,
        d: args.d,
        sd: args.sd,
    };
    let test = args.common.test_kind()?;
    let config = args.common.power_config(workers)?;

    info!("=== Three-sample power ===");
    info!(
        "n={}, epsilon={}, weight={}, case={}, d={}",
        params.n, params.epsilon, params.weight, params.case, params.d
    );

    let estimate = power_3samp_epsweight_estimate(&test, &params, &config)?;
    args.common.report(&estimate)
}
