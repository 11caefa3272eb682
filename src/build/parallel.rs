//! Parallel species execution.
//!
//! Species are independent, so a step can process them on a rayon thread
//! pool. Results always come back in input order, whatever the number of
//! workers.
//!
//! # Example
//!
//! ```ignore
//! use dexsprite::build::ParallelRunner;
//!
//! let runner = ParallelRunner::new(4);
//! let keys = runner.map(&species, |dir| dir.key().to_string())?;
//! ```

use rayon::prelude::*;

/// Default number of parallel jobs (uses available parallelism).
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Maps a function over items, sequentially or on a thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelRunner {
    /// Number of worker threads
    jobs: usize,
}

impl ParallelRunner {
    /// Create a runner with `jobs` workers (at least one).
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    /// Get the number of parallel jobs.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Whether the runner uses more than one thread.
    pub fn is_parallel(&self) -> bool {
        self.jobs > 1
    }

    /// Apply `f` to every item, returning the results in item order.
    ///
    /// With one job this runs on the calling thread and never builds a pool.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>, rayon::ThreadPoolBuildError>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        if !self.is_parallel() || items.len() < 2 {
            return Ok(items.iter().map(f).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build()?;
        Ok(pool.install(|| items.par_iter().map(f).collect()))
    }
}

impl Default for ParallelRunner {
    fn default() -> Self {
        Self::new(1)
    }
}
