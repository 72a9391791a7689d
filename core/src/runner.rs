//! The scan run engine: job dispatch, the bounded worker pool and the run
//! lifecycle around them.
//!
//! Jobs are self-contained (one target, one private output path), so the
//! only shared structure between workers is the job queue itself. Workers
//! drain it until empty and the pool completes at a single join barrier.
//! A job that fails or times out is logged and absorbed; it never stops a
//! sibling job or the run.
//!
//! Invocation of the actual scanner lives behind the [`JobRunner`] seam in
//! [`invoke`], which keeps the pool mechanics testable without spawning
//! processes.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fanmap_common::config::RunConfig;
use fanmap_common::error::RunError;
use fanmap_common::success;
use fanmap_common::target::Target;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::merge;
use crate::nmap::NmapRun;

pub mod invoke;

pub use invoke::NmapRunner;

/// One dispatch unit: a target bound to the private path its partial
/// result document goes to. Consumed exactly once by exactly one worker.
#[derive(Debug, Clone)]
pub struct Job {
    pub target: Target,
    pub output_path: PathBuf,
}

/// How one job ended.
#[derive(Debug)]
pub enum Outcome {
    /// The scanner exited zero; the partial document is on disk.
    Success,
    /// The deadline expired and the scanner process was killed.
    Timeout,
    /// The scanner never ran usefully: spawn failure, non-zero exit,
    /// flags that would not tokenize.
    Failure(String),
}

/// Per-run outcome counters, summed across workers at the join barrier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub timed_out: usize,
    pub failed: usize,
}

impl Tally {
    fn absorb(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Timeout => self.timed_out += 1,
            Outcome::Failure(_) => self.failed += 1,
        }
    }

    fn merge(&mut self, other: Tally) {
        self.succeeded += other.succeeded;
        self.timed_out += other.timed_out;
        self.failed += other.failed;
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.timed_out + self.failed
    }
}

/// Executes one job. The pool only ever sees this seam; the production
/// implementation is [`invoke::NmapRunner`].
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run_job(&self, job: &Job) -> Outcome;
}

/// Callback fired after each finished job, for progress reporting.
pub type JobObserver = Box<dyn Fn(&Job, &Outcome) + Send + Sync>;

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub tally: Tally,
    /// The merged document, once it was also written to the configured
    /// output path. `None` when no partial results existed to merge.
    pub merged: Option<NmapRun>,
}

/// Runs the whole engine: scratch directory, dispatch, pool, aggregation.
///
/// The scratch directory and every partial document in it are removed when
/// this returns, on every path.
pub async fn execute(
    cfg: &RunConfig,
    targets: Vec<Target>,
    observer: Option<JobObserver>,
) -> Result<RunReport, RunError> {
    let scratch = tempfile::Builder::new()
        .prefix("fanmap-scans-")
        .tempdir()
        .map_err(RunError::ScratchDir)?;
    debug!("scratch directory at {}", scratch.path().display());

    if cfg.profile.wants_privilege() && !is_root::is_root() {
        warn!(
            "{} profile wants root for SYN scans, results may degrade",
            cfg.profile.label()
        );
    }

    let jobs = make_jobs(targets, scratch.path());
    let job_count = jobs.len();
    let runner: Arc<dyn JobRunner> = Arc::new(NmapRunner::from_config(cfg));
    let tally = run_pool(jobs, cfg.workers, runner, observer).await;
    debug!(
        "pool drained: {}/{} scans succeeded, {} timed out, {} failed",
        tally.succeeded, job_count, tally.timed_out, tally.failed
    );

    let partials = merge::collect_partials(scratch.path()).map_err(RunError::ScratchDir)?;
    if partials.is_empty() {
        warn!("no scan results to merge");
        return Ok(RunReport {
            tally,
            merged: None,
        });
    }

    let merged = merge::merge(&partials)?;
    merge::write_merged(&merged, &cfg.output)?;
    success!(
        "merged {} scan results into {}",
        partials.len(),
        cfg.output.display()
    );

    Ok(RunReport {
        tally,
        merged: Some(merged),
    })
}

/// Binds each target to its private output path inside `dir`.
///
/// The ordinal prefix keeps paths unique even when two hosts sanitize to
/// the same name, and makes the sorted partial listing follow target
/// order.
pub fn make_jobs(targets: Vec<Target>, dir: &Path) -> Vec<Job> {
    targets
        .into_iter()
        .enumerate()
        .map(|(idx, target)| {
            let file_name = format!("{:04}_{}.xml", idx, sanitize(&target.host));
            Job {
                output_path: dir.join(file_name),
                target,
            }
        })
        .collect()
}

/// Anything that is not filename-safe becomes an underscore.
fn sanitize(host: &str) -> String {
    host.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Drains `jobs` with exactly `workers` concurrent workers.
///
/// Every job is enqueued before the first worker spawns. Workers pop one
/// job at a time until the queue is empty, then the pool joins and the
/// per-worker tallies are summed. A worker panic loses that worker's
/// tally, never the queue.
pub async fn run_pool(
    jobs: Vec<Job>,
    workers: usize,
    runner: Arc<dyn JobRunner>,
    observer: Option<JobObserver>,
) -> Tally {
    let queue: Arc<Mutex<VecDeque<Job>>> = Arc::new(Mutex::new(VecDeque::from(jobs)));
    let observer: Option<Arc<JobObserver>> = observer.map(Arc::new);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers.max(1) {
        let queue = Arc::clone(&queue);
        let runner = Arc::clone(&runner);
        let observer = observer.clone();

        handles.push(tokio::spawn(async move {
            let mut tally = Tally::default();
            loop {
                let job = queue.lock().await.pop_front();
                let Some(job) = job else {
                    break;
                };

                let outcome = runner.run_job(&job).await;
                match &outcome {
                    Outcome::Success => debug!("finished {}", job.target.host),
                    Outcome::Timeout => error!("scan of {} timed out", job.target.host),
                    Outcome::Failure(cause) => {
                        error!("scan of {} failed: {}", job.target.host, cause)
                    }
                }

                tally.absorb(&outcome);
                if let Some(cb) = &observer {
                    cb(&job, &outcome);
                }
            }
            tally
        }));
    }

    let mut total = Tally::default();
    for handle in handles {
        match handle.await {
            Ok(tally) => total.merge(tally),
            Err(e) => error!("scan worker panicked: {e}"),
        }
    }
    total
}
