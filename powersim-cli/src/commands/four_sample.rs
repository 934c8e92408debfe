//! Four-sample two-way Gaussian power.
//!
//! powersim four-sample --epsilon1 0.5 --epsilon2 0.5 --case 1 --multiway ...

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use powersim_core::power::{
    power_4samp_2way_epsweight_estimate, FourSampleOptions, FourSampleParams,
};
use powersim_core::{PermutationStructure, Workers};

use super::{parse_list, CommonArgs};

#[derive(Args)]
pub struct FourSampleArgs {
    /// Observations per group
    #[arg(long, default_value = "100")]
    n: usize,

    /// Effect size of the first factor
    #[arg(long, default_value = "0.5")]
    epsilon1: f64,

    /// Effect size of the second factor
    #[arg(long, default_value = "0.5")]
    epsilon2: f64,

    /// Per-group effect switches as four comma-separated 0/1 values
    #[arg(long)]
    effect_mask: Option<String>,

    /// Mixture weight, in [0, 1]
    #[arg(long, default_value = "0")]
    weight: f64,

    /// Effect pattern (1-3)
    #[arg(long, default_value = "1")]
    case: u8,

    /// Dimension (at least 2)
    #[arg(long, default_value = "2")]
    d: usize,

    /// Standard deviation of each coordinate
    #[arg(long, default_value = "1")]
    sd: f64,

    /// Test on distance matrices of the observations and the 2x2 factor labels
    #[arg(long)]
    multiway: bool,

    /// Permutation structure (only "global" is supported)
    #[arg(long, default_value = "global")]
    structure: String,

    #[command(flatten)]
    common: CommonArgs,
}

fn parse_mask(s: &str) -> Result<[bool; 4]> {
    let values: Vec<u8> = parse_list(s)?;
    if values.len() != 4 || values.iter().any(|&v| v > 1) {
        bail!("--effect-mask needs four 0/1 values, got {:?}", s);
    }
    Ok([values[0] == 1, values[1] == 1, values[2] == 1, values[3] == 1])
}

pub fn run(args: FourSampleArgs, workers: Workers) -> Result<()> {
    if !(1..=3).contains(&args.case) {
        bail!("--case must be between 1 and 3, got {}", args.case);
    }
    let structure: PermutationStructure = args.structure.parse()?;
    let effect_mask = args.effect_mask.as_deref().map(parse_mask).transpose()?;

    let params = FourSampleParams {
        n: args.n,
        epsilon1: args.epsilon1,
        epsilon2: args.epsilon2,
        effect_mask,
        weight: args.weight,
        case: args.case,
        d: args.d,
        multiway: args.multiway,
        structure,
        sim_options: FourSampleOptions { sd: args.sd },
    };
    let test = args.common.test_kind()?;
    let config = args.common.power_config(workers)?;

    info!("=== Four-sample two-way power ===");
    info!(
        "n={}, epsilon1={}, epsilon2={}, weight={}, case={}, multiway={}",
        params.n, params.epsilon1, params.epsilon2, params.weight, params.case, params.multiway
    );

    let estimate = power_4samp_2way_epsweight_estimate(&test, &params, &config)?;
    args.common.report(&estimate)
}
