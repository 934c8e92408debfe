//! Per-repetition work: generate, transform, observe, permute.
//!
//! A `PermutationTask` is an immutable description of the experiment.
//! `run_repetition(&task, i)` is a pure function of the task and the index
//! `i`: all of its randomness comes from stream `i`, so repetitions can be
//! scheduled on any worker in any order.

use std::fmt;
use std::str::FromStr;

use powersim_linalg::{pairwise_distances, DenseMatrix, Metric};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::parallel::ParallelMap;
use crate::error::{PowerError, Result, Stage};
use crate::ksample::k_sample_transform;
use crate::rng::RandomStreams;
use crate::sampler::SampleGenerator;
use crate::stats::IndependenceTest;

/// How labels are exchanged when building the null distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermutationStructure {
    /// Every observation is exchangeable with every other.
    #[default]
    Global,
    /// Exchangeability restricted within blocks. Recognized, not supported.
    Multilevel,
}

impl PermutationStructure {
    pub fn name(self) -> &'static str {
        match self {
            PermutationStructure::Global => "global",
            PermutationStructure::Multilevel => "multilevel",
        }
    }

    pub fn ensure_supported(self) -> Result<()> {
        match self {
            PermutationStructure::Global => Ok(()),
            PermutationStructure::Multilevel => {
                Err(PowerError::UnsupportedStructure(self.name().to_string()))
            }
        }
    }
}

impl fmt::Display for PermutationStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PermutationStructure {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "global" | "none" => Ok(PermutationStructure::Global),
            "multilevel" => Ok(PermutationStructure::Multilevel),
            _ => Err(PowerError::UnsupportedStructure(s.to_string())),
        }
    }
}

/// Shape of the statistic inputs and of the permutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Topology {
    /// Statistic on `(u, v)`; the null permutes the rows of `v`.
    #[default]
    Standard,
    /// Statistic directly on the paired `(x, y)` the generator draws, with
    /// no k-sample transform; the null permutes the rows of `y`.
    Independence,
    /// Statistic on the Euclidean distances of `u` and the squared
    /// Euclidean distances of the factor labels `v`; the null permutes
    /// rows and columns of the label distance matrix together.
    Multiway { ways: Vec<[u8; 2]> },
}

impl Topology {
    /// Two crossed binary factors over four groups.
    pub fn four_way() -> Self {
        Topology::Multiway {
            ways: powersim_sims::FOUR_SAMPLE_WAYS.to_vec(),
        }
    }
}

/// Everything a repetition needs, shared read-only by all workers.
pub struct PermutationTask<'a> {
    pub generator: &'a dyn SampleGenerator,
    pub test: &'a dyn IndependenceTest,
    pub topology: Topology,
    pub streams: RandomStreams,
}

impl<'a> PermutationTask<'a> {
    pub fn reps(&self) -> usize {
        self.streams.len()
    }
}

/// Alternate and null statistics, aligned by repetition index.
#[derive(Debug, Clone, PartialEq)]
pub struct Distributions {
    pub alternate: Vec<f64>,
    pub null: Vec<f64>,
}

/// Run repetition `index` and return `(observed, permuted)`.
pub fn run_repetition(task: &PermutationTask<'_>, index: usize) -> Result<(f64, f64)> {
    let mut rng = task.streams.rng(index);

    let groups = task
        .generator
        .generate(&mut rng)
        .map_err(|e| e.at(index, Stage::Generate))?;

    let encoding = task.test.label_encoding();
    match &task.topology {
        Topology::Standard | Topology::Independence => {
            let pair = if task.topology == Topology::Independence {
                paired(groups)
            } else {
                k_sample_transform(&groups, encoding, None)
            };
            let (u, v) = pair.map_err(|e| e.at(index, Stage::Transform))?;

            let observed =
                evaluate(task.test, &u, &v).map_err(|e| e.at(index, Stage::Observe))?;

            let mut order: Vec<usize> = (0..v.nrows()).collect();
            order.shuffle(&mut rng);
            let permuted = v
                .select_rows(&order)
                .map_err(PowerError::from)
                .and_then(|pv| evaluate(task.test, &u, &pv))
                .map_err(|e| e.at(index, Stage::Permute))?;

            Ok((observed, permuted))
        }
        Topology::Multiway { ways } => {
            let (u, v) = k_sample_transform(&groups, encoding, Some(ways.as_slice()))
                .map_err(|e| e.at(index, Stage::Transform))?;
            let u_dist = pairwise_distances(&u, Metric::Euclidean);
            let v_dist = pairwise_distances(&v, Metric::SqEuclidean);

            let observed = evaluate(task.test, &u_dist, &v_dist)
                .map_err(|e| e.at(index, Stage::Observe))?;

            let mut order: Vec<usize> = (0..v_dist.nrows()).collect();
            order.shuffle(&mut rng);
            let permuted = v_dist
                .permute_symmetric(&order)
                .map_err(PowerError::from)
                .and_then(|pv| evaluate(task.test, &u_dist, &pv))
                .map_err(|e| e.at(index, Stage::Permute))?;

            Ok((observed, permuted))
        }
    }
}

/// Run every repetition of `task` through `map`.
pub fn run_permutations<M: ParallelMap>(
    task: &PermutationTask<'_>,
    map: &M,
) -> Result<Distributions> {
    let reps = task.reps();
    info!(
        "Running {} repetitions of {} ({:?} topology)",
        reps,
        task.test.name(),
        task.topology
    );

    let pairs = map.map(reps, |i| run_repetition(task, i))?;
    let (alternate, null): (Vec<f64>, Vec<f64>) =
        pairs.into_iter().collect::<Result<Vec<_>>>()?.into_iter().unzip();

    debug!("Collected {} alternate and {} null statistics", alternate.len(), null.len());
    Ok(Distributions { alternate, null })
}

/// Split a generated `[x, y]` into its two halves.
fn paired(groups: Vec<DenseMatrix>) -> Result<(DenseMatrix, DenseMatrix)> {
    let count = groups.len();
    let mut iter = groups.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (Some(x), Some(y), None) if x.nrows() == y.nrows() => Ok((x, y)),
        (Some(x), Some(y), None) => Err(PowerError::InvalidParameter {
            name: "samples",
            reason: format!("x has {} rows but y has {}", x.nrows(), y.nrows()),
        }),
        _ => Err(PowerError::InvalidParameter {
            name: "samples",
            reason: format!("independence needs exactly (x, y), got {} matrices", count),
        }),
    }
}

fn evaluate(test: &dyn IndependenceTest, x: &DenseMatrix, y: &DenseMatrix) -> Result<f64> {
    let stat = test.statistic(x, y)?;
    if !stat.is_finite() {
        return Err(PowerError::NonFinite {
            test: test.name().to_string(),
            value: stat,
        });
    }
    Ok(stat)
}
