//! Order-preserving parallel map over repetition indices.
//!
//! `ParallelMap::map(len, f)` evaluates `f(0), ..., f(len - 1)` and
//! returns the results in index order, however the work was scheduled.
//! A panic inside `f` is caught and reported as a resource error for the
//! lowest panicking index.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{PowerError, Result};

/// Number of workers to run repetitions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workers {
    /// Every available execution unit.
    All,
    /// A fixed count; `Count(1)` runs strictly sequentially.
    Count(NonZeroUsize),
}

impl Workers {
    pub const SEQUENTIAL: Workers = Workers::Count(NonZeroUsize::MIN);

    /// Interpret a worker count where `-1` requests all execution units.
    pub fn from_count(count: i64) -> Result<Self> {
        match count {
            -1 => Ok(Workers::All),
            c if c > 0 => Ok(Workers::Count(
                NonZeroUsize::new(c as usize).ok_or_else(|| invalid_workers(c))?,
            )),
            c => Err(invalid_workers(c)),
        }
    }

    /// Resolved thread count.
    pub fn threads(self) -> usize {
        match self {
            Workers::All => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            Workers::Count(n) => n.get(),
        }
    }
}

impl Default for Workers {
    fn default() -> Self {
        Workers::SEQUENTIAL
    }
}

impl FromStr for Workers {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self> {
        let count: i64 = s.trim().parse().map_err(|_| PowerError::InvalidParameter {
            name: "workers",
            reason: format!("expected an integer, got {:?}", s),
        })?;
        Workers::from_count(count)
    }
}

fn invalid_workers(count: i64) -> PowerError {
    PowerError::InvalidParameter {
        name: "workers",
        reason: format!("must be positive or -1 for all cores, got {}", count),
    }
}

/// Maps a function over `0..len`, returning results in index order.
pub trait ParallelMap {
    fn map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;
}

/// Runs every index on the calling thread, in order.
///
/// Rayon work nested inside `f` still uses whatever pool the caller is
/// on; `WorkerPool` confines it for `Workers::SEQUENTIAL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ParallelMap for Sequential {
    fn map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..len).map(|i| guarded(i, &f)).collect()
    }
}

/// Runs indices on a dedicated rayon pool.
pub struct RayonMap {
    pool: ThreadPool,
}

impl RayonMap {
    pub fn new(threads: usize) -> Result<Self> {
        Ok(Self {
            pool: build_pool(threads)?,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ParallelMap for RayonMap {
    fn map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        // Indexed collect keeps positional correspondence with 0..len
        let results: Vec<Result<T>> = self
            .pool
            .install(|| (0..len).into_par_iter().map(|i| guarded(i, &f)).collect());
        results.into_iter().collect()
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("powersim-worker-{}", i))
        .build()
        .map_err(|e| PowerError::WorkerPool(e.to_string()))
}

/// The map selected by a `Workers` setting.
///
/// Every variant runs on its own pool, so rayon work nested inside a
/// repetition (pairwise distances, for one) never spills onto the global
/// pool and the thread count stays what `Workers` asked for.
pub enum WorkerPool {
    /// Indices in order on the single thread of the pool.
    Sequential(ThreadPool),
    Rayon(RayonMap),
}

impl WorkerPool {
    pub fn new(workers: Workers) -> Result<Self> {
        match workers.threads() {
            1 => Ok(WorkerPool::Sequential(build_pool(1)?)),
            n => Ok(WorkerPool::Rayon(RayonMap::new(n)?)),
        }
    }

    pub fn threads(&self) -> usize {
        match self {
            WorkerPool::Sequential(_) => 1,
            WorkerPool::Rayon(pool) => pool.threads(),
        }
    }
}

impl ParallelMap for WorkerPool {
    fn map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            WorkerPool::Sequential(pool) => pool.install(|| Sequential.map(len, f)),
            WorkerPool::Rayon(m) => m.map(len, f),
        }
    }
}

fn guarded<T, F>(index: usize, f: &F) -> Result<T>
where
    F: Fn(usize) -> T,
{
    panic::catch_unwind(AssertUnwindSafe(|| f(index))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        PowerError::WorkerPanic { index, message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;
    use std::thread::{self, ThreadId};

    #[test]
    fn test_workers_sentinel() {
        assert_eq!(Workers::from_count(-1).unwrap(), Workers::All);
        assert_eq!(Workers::from_count(1).unwrap(), Workers::SEQUENTIAL);
        assert!(Workers::from_count(0).is_err());
        assert!(Workers::from_count(-3).is_err());
        assert_eq!("4".parse::<Workers>().unwrap().threads(), 4);
        assert!(Workers::All.threads() >= 1);
    }

    #[test]
    fn test_sequential_in_order() {
        let out = Sequential.map(5, |i| i * 10).unwrap();
        assert_eq!(out, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn test_rayon_preserves_index_order() {
        let pool = RayonMap::new(4).unwrap();
        let out = pool
            .map(1000, |i| {
                // Uneven work so completion order differs from index order
                let spin = (1000 - i) % 17;
                (0..spin * 100).fold(i, |acc, _| acc)
            })
            .unwrap();
        assert_eq!(out, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_panic_becomes_resource_error() {
        let pool = RayonMap::new(2).unwrap();
        let err = pool
            .map(20, |i| {
                if i == 7 || i == 13 {
                    panic!("boom at {}", i);
                }
                i
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
        assert!(matches!(err, PowerError::WorkerPanic { index: 7, .. }));
    }

    #[test]
    fn test_worker_pool_selection() {
        assert!(matches!(
            WorkerPool::new(Workers::SEQUENTIAL).unwrap(),
            WorkerPool::Sequential(_)
        ));
        let pool = WorkerPool::new(Workers::from_count(3).unwrap()).unwrap();
        assert_eq!(pool.threads(), 3);
    }

    #[test]
    fn test_sequential_pool_confines_nested_rayon() {
        // Run from inside a wide pool so an unconfined par_iter would fan out
        let wide = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let observed: Vec<(usize, Vec<ThreadId>)> = wide.install(|| {
            WorkerPool::new(Workers::SEQUENTIAL)
                .unwrap()
                .map(3, |_| {
                    let ids: Vec<ThreadId> = (0..512)
                        .into_par_iter()
                        .map(|i| {
                            let spin = (0..(i % 7) * 50).fold(i, |acc, _| acc);
                            std::hint::black_box(spin);
                            thread::current().id()
                        })
                        .collect();
                    (rayon::current_num_threads(), ids)
                })
                .unwrap()
        });

        let distinct: HashSet<ThreadId> = observed
            .iter()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        assert_eq!(distinct.len(), 1);
        assert!(observed.iter().all(|(threads, _)| *threads == 1));
    }

    #[test]
    fn test_rayon_pool_caps_nested_work() {
        let pool = WorkerPool::new(Workers::from_count(2).unwrap()).unwrap();
        let counts = pool.map(4, |_| rayon::current_num_threads()).unwrap();
        assert_eq!(counts, vec![2; 4]);
    }
}
