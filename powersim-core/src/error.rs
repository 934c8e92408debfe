//! Error taxonomy for power estimation.
//!
//! Configuration errors are raised before or during setup, computation
//! errors come from simulators and statistics, and resource errors come
//! from the worker pool. Any failure inside a repetition is wrapped in
//! `PowerError::Repetition` with the index and stage it happened at, and
//! aborts the whole estimate.

use std::fmt;

use powersim_linalg::LinalgError;
use powersim_sims::SimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PowerError {
    #[error("Unknown test: {0}")]
    UnknownTest(String),

    #[error("Unsupported permutation structure: {0}")]
    UnsupportedStructure(String),

    #[error("Group {group} has {got} columns, expected {expected}")]
    ShapeMismatch {
        group: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Distribution length mismatch: {alternate} alternate vs {null} null statistics")]
    LengthMismatch { alternate: usize, null: usize },

    #[error("Test cannot be run, the inputs have 0 variance")]
    DegenerateInput,

    #[error("Statistic {test} returned a non-finite value ({value})")]
    NonFinite { test: String, value: f64 },

    #[error("Statistic {test} failed: {reason}")]
    Statistic { test: String, reason: String },

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("Worker panicked while running repetition {index}: {message}")]
    WorkerPanic { index: usize, message: String },

    #[error("Repetition {index} failed while {stage}: {source}")]
    Repetition {
        index: usize,
        stage: Stage,
        #[source]
        source: Box<PowerError>,
    },
}

pub type Result<T> = std::result::Result<T, PowerError>;

/// Broad class of an error, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Computation,
    Resource,
}

impl PowerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PowerError::UnknownTest(_)
            | PowerError::UnsupportedStructure(_)
            | PowerError::ShapeMismatch { .. }
            | PowerError::InvalidParameter { .. }
            | PowerError::LengthMismatch { .. }
            | PowerError::Linalg(_) => ErrorKind::Configuration,
            PowerError::Simulation(SimError::Distribution(_)) => ErrorKind::Computation,
            PowerError::Simulation(_) => ErrorKind::Configuration,
            PowerError::DegenerateInput
            | PowerError::NonFinite { .. }
            | PowerError::Statistic { .. } => ErrorKind::Computation,
            PowerError::WorkerPool(_) | PowerError::WorkerPanic { .. } => ErrorKind::Resource,
            PowerError::Repetition { source, .. } => source.kind(),
        }
    }

    /// Attach the repetition index and stage to an error.
    pub(crate) fn at(self, index: usize, stage: Stage) -> PowerError {
        PowerError::Repetition {
            index,
            stage,
            source: Box::new(self),
        }
    }
}

/// Stage of a repetition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Transform,
    Observe,
    Permute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Generate => "generating samples",
            Stage::Transform => "transforming samples",
            Stage::Observe => "computing the observed statistic",
            Stage::Permute => "computing the permuted statistic",
        };
        f.write_str(s)
    }
}
