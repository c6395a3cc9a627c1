// One conversion run over a directory: scan, skip converted, convert the rest

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::worker::{WorkerMessage, WorkerPool, available_workers};
use super::{BatchReport, ConversionJob, Encoder, JobStatus, build_job_queue, scan};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub directory: PathBuf,
    /// Extension token matched as a suffix and replaced to form the output name
    pub extension: String,
    pub max_workers: usize,
    pub encoder: Encoder,
    /// Append full encoder diagnostics here when set
    pub debug_log: Option<PathBuf>,
}

impl BatchOptions {
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
            max_workers: available_workers(),
            encoder: Encoder::default(),
            debug_log: None,
        }
    }
}

/// Scan `dir` and build the job list, with already-converted files marked Skipped.
/// Fails only when the directory itself can't be read.
pub fn plan_batch(dir: &Path, extension: &str) -> Result<Vec<ConversionJob>> {
    let names = scan(dir, extension)?;
    Ok(build_job_queue(dir, names, extension))
}

/// Convert every matching, not yet converted file and wait for all of them.
///
/// An empty report means nothing matched the extension. Per-file failures
/// are recorded in the report and never abort the run.
pub fn run_batch(options: &BatchOptions) -> Result<BatchReport> {
    let jobs = plan_batch(&options.directory, &options.extension)?;
    if jobs.is_empty() {
        return Ok(BatchReport::default());
    }

    for job in jobs.iter().filter(|job| job.status == JobStatus::Skipped) {
        tracing::info!("{} already processed.", job.input_path.display());
    }

    let pool = WorkerPool::new(options.max_workers);
    tracing::debug!(
        candidates = jobs.len(),
        workers = pool.max_workers(),
        "starting conversions"
    );

    let encoder = &options.encoder;
    let debug_log = options.debug_log.as_deref();
    let jobs = pool.run(jobs, |job| encoder.convert(job, debug_log), log_message);

    Ok(BatchReport::new(jobs))
}

fn log_message(message: &WorkerMessage, job: Option<&ConversionJob>) {
    match (message, job) {
        (WorkerMessage::JobStarted { worker_id, .. }, Some(job)) => {
            tracing::debug!(worker_id, "converting {}", job.input_path.display());
        }
        (WorkerMessage::JobCompleted { .. }, Some(job)) => {
            tracing::info!("{} converted successfully.", job.input_path.display());
        }
        (WorkerMessage::JobFailed { error, .. }, Some(job)) => {
            tracing::error!("Error converting {}: {}", job.input_path.display(), error);
        }
        (WorkerMessage::WorkerIdle { worker_id }, _) => {
            tracing::trace!(worker_id, "worker idle");
        }
        _ => {}
    }
}
