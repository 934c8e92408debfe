//! Two-sample power curve over sample size, dimension or angle.
//!
//! powersim curve --sweep n --values 10,20,50,100 --sim linear ...

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use powersim_core::power::{power_2samp_curve, Sweep};
use powersim_core::Workers;

use super::parse_list;
use super::two_sample::TwoSampleArgs;

#[derive(Args)]
pub struct CurveArgs {
    /// Parameter to sweep: n, p or angle
    #[arg(long)]
    sweep: String,

    /// Comma-separated values of the swept parameter
    #[arg(long)]
    values: String,

    #[command(flatten)]
    base: TwoSampleArgs,
}

fn parse_sweep(name: &str, values: &str) -> Result<Sweep> {
    let sweep = match name {
        "n" | "sample" => Sweep::SampleSize(parse_list(values)?),
        "p" | "dimension" => Sweep::Dimension(parse_list(values)?),
        "angle" => Sweep::Angle(parse_list(values)?),
        other => bail!("Unknown sweep parameter: {} (expected n, p or angle)", other),
    };
    if sweep.is_empty() {
        bail!("--values must list at least one value");
    }
    Ok(sweep)
}

pub fn run(args: CurveArgs, workers: Workers) -> Result<()> {
    let sweep = parse_sweep(&args.sweep, &args.values)?;
    let params = args.base.params()?;
    let test = args.base.common.test_kind()?;
    let config = args.base.common.power_config(workers)?;

    info!("=== Two-sample power curve over {} ===", sweep.name());

    let curve = power_2samp_curve(&test, &params, &sweep, &config)?;
    println!("{}\tpower", sweep.name());
    for point in &curve {
        println!("{}\t{:.4}", point.value, point.power);
    }
    args.base.common.write_json(&curve)
}
