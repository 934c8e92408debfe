//! Independence power, at one setting or swept over n or p.
//!
//! powersim independence --sim linear --n 100 --p 1 ...
//! powersim independence --sim cubic --sweep n --values 10,20,50 ...

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use powersim_core::power::{
    power_indep_dim, power_indep_estimate, power_indep_sample, IndependenceParams,
};
use powersim_core::Workers;
use powersim_sims::IndepSim;

use super::{parse_list, CommonArgs};

#[derive(Args)]
pub struct IndependenceArgs {
    /// Independence simulator (linear, exponential, cubic, joint_normal, step,
    /// quadratic, w_shaped, multiplicative_noise, multimodal_independence)
    #[arg(long, default_value = "linear")]
    sim: String,

    /// Sample size
    #[arg(long, default_value = "100")]
    n: usize,

    /// Dimension of x
    #[arg(long, default_value = "1")]
    p: usize,

    /// Disable additive noise for simulators that take it
    #[arg(long)]
    no_noise: bool,

    /// Sweep n or p instead of a single estimate
    #[arg(long, requires = "values")]
    sweep: Option<String>,

    /// Comma-separated values of the swept parameter
    #[arg(long)]
    values: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

pub fn run(args: IndependenceArgs, workers: Workers) -> Result<()> {
    let sim: IndepSim = args.sim.parse()?;
    let params = IndependenceParams {
        sim,
        n: args.n,
        p: args.p,
        noise: !args.no_noise,
    };
    let test = args.common.test_kind()?;
    let config = args.common.power_config(workers)?;

    let Some(name) = args.sweep.as_deref() else {
        info!("=== Independence power ===");
        info!(
            "Simulator: {}, n={}, p={}, noise={}",
            params.sim, params.n, params.p, params.noise
        );
        let estimate = power_indep_estimate(&test, &params, &config)?;
        return args.common.report(&estimate);
    };

    let values: Vec<usize> = parse_list(args.values.as_deref().unwrap_or_default())?;
    if values.is_empty() {
        bail!("--values must list at least one value");
    }
    info!("=== Independence power curve over {} ===", name);
    let curve = match name {
        "n" | "sample" => power_indep_sample(&test, &params, &values, &config)?,
        "p" | "dimension" => power_indep_dim(&test, &params, &values, &config)?,
        other => bail!("Unknown sweep parameter: {} (expected n or p)", other),
    };
    println!("{}\tpower", name);
    for point in &curve {
        println!("{}\t{:.4}", point.value, point.power);
    }
    args.common.write_json(&curve)
}
