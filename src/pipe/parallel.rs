use std::sync::{Arc, Mutex, PoisonError};

use rayon::prelude::*;

use crate::foundation::error::{GammaError, GammaResult};
use crate::gamma::lut::GammaLut;
use crate::pipe::sequence::TileContext;

/// Independent unit of compositing work, typically a band or layer with its own
/// destination surface.
pub trait FillJob: Send {
    /// Run every sequence of the job with the worker's context.
    fn fill(&mut self, ctx: &mut TileContext) -> GammaResult<()>;
}

impl<F> FillJob for F
where
    F: FnMut(&mut TileContext) -> GammaResult<()> + Send,
{
    fn fill(&mut self, ctx: &mut TileContext) -> GammaResult<()> {
        self(ctx)
    }
}

/// Options for [`run_parallel`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParallelOpts {
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Long-lived worker pool with one [`TileContext`] per worker thread.
///
/// Each worker composites with its own context, looked up by its pool index, so
/// scratch buffers stay warm across jobs and across [`ParallelRunner::run`] calls.
/// Jobs must not wait on nested work in the same pool.
#[derive(Debug)]
pub struct ParallelRunner {
    pool: rayon::ThreadPool,
    contexts: Vec<Mutex<TileContext>>,
}

impl ParallelRunner {
    /// Build the pool and one context per worker, all sharing `lut`.
    pub fn new(opts: &ParallelOpts, lut: Arc<GammaLut>) -> GammaResult<Self> {
        let pool = build_thread_pool(opts.threads)?;
        let contexts = (0..pool.current_num_threads())
            .map(|_| Mutex::new(TileContext::with_lut(Arc::clone(&lut))))
            .collect();
        Ok(Self { pool, contexts })
    }

    /// Number of worker threads (and contexts).
    pub fn threads(&self) -> usize {
        self.contexts.len()
    }

    /// Run `jobs` on the pool.
    ///
    /// Every job runs even when another fails; the first error in job order is
    /// returned.
    #[tracing::instrument(level = "debug", skip_all, fields(jobs = jobs.len(), threads = self.threads()))]
    pub fn run<J: FillJob>(&self, jobs: &mut [J]) -> GammaResult<()> {
        let (pool, contexts) = (&self.pool, &self.contexts);
        let results = pool.install(|| {
            jobs.par_iter_mut()
                .map(|job| {
                    let idx = pool.current_thread_index().ok_or_else(|| {
                        GammaError::Other(anyhow::anyhow!("fill job ran outside the worker pool"))
                    })?;
                    let mut ctx = contexts[idx]
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    job.fill(&mut ctx)
                })
                .collect::<Vec<_>>()
        });
        results.into_iter().collect::<GammaResult<Vec<()>>>()?;
        tracing::debug!("parallel fill finished");
        Ok(())
    }
}

/// Run `jobs` once on a fresh [`ParallelRunner`].
///
/// Callers filling repeatedly should keep a runner instead, so worker contexts
/// are reused between calls.
pub fn run_parallel<J: FillJob>(
    jobs: &mut [J],
    opts: &ParallelOpts,
    lut: Arc<GammaLut>,
) -> GammaResult<()> {
    ParallelRunner::new(opts, lut)?.run(jobs)
}

fn build_thread_pool(threads: Option<usize>) -> GammaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GammaError::validation(
            "parallel 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GammaError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipe/parallel.rs"]
mod tests;
