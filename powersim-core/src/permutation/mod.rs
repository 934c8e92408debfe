pub mod executor;
pub mod parallel;

pub use executor::{
    run_permutations, run_repetition, Distributions, PermutationStructure, PermutationTask,
    Topology,
};
pub use parallel::{ParallelMap, RayonMap, Sequential, WorkerPool, Workers};
