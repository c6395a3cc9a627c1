// Bounded worker pool for running conversions in parallel

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use uuid::Uuid;

use super::{ConversionJob, ConvertError, JobStatus};

/// Message from worker to main thread
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Worker picked up a job
    JobStarted { job_id: Uuid, worker_id: usize },

    /// Job completed successfully
    JobCompleted { job_id: Uuid },

    /// Job failed with error
    JobFailed { job_id: Uuid, error: String },

    /// Worker found the queue empty and exited
    WorkerIdle { worker_id: usize },
}

/// Default pool size: the machine's available parallelism
pub fn available_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Fixed-size pool; at most `max_workers` conversions run at once
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    /// Create a new worker pool. A size of zero is treated as one.
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Get the maximum number of workers
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Run every Pending job through `convert` and block until all have finished.
    ///
    /// Jobs are claimed in queue order. Jobs in any other state are left
    /// untouched. Each worker message is passed to `on_message` on the calling
    /// thread, together with the job it concerns after its status was updated.
    pub fn run<F, M>(
        &self,
        mut jobs: Vec<ConversionJob>,
        convert: F,
        mut on_message: M,
    ) -> Vec<ConversionJob>
    where
        F: Fn(&ConversionJob) -> Result<(), ConvertError> + Sync,
        M: FnMut(&WorkerMessage, Option<&ConversionJob>),
    {
        let queue: Vec<ConversionJob> = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Pending)
            .cloned()
            .collect();
        if queue.is_empty() {
            return jobs;
        }

        let index_by_id: HashMap<Uuid, usize> = jobs
            .iter()
            .enumerate()
            .map(|(index, job)| (job.id, index))
            .collect();

        let worker_count = self.max_workers.min(queue.len());
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            for worker_id in 0..worker_count {
                let tx = tx.clone();
                let (queue, next, convert) = (&queue, &next, &convert);

                scope.spawn(move || {
                    while let Some(job) = queue.get(next.fetch_add(1, Ordering::SeqCst)) {
                        let _ = tx.send(WorkerMessage::JobStarted {
                            job_id: job.id,
                            worker_id,
                        });

                        let message = match convert(job) {
                            Ok(()) => WorkerMessage::JobCompleted { job_id: job.id },
                            Err(e) => WorkerMessage::JobFailed {
                                job_id: job.id,
                                error: e.to_string(),
                            },
                        };
                        let _ = tx.send(message);
                    }

                    let _ = tx.send(WorkerMessage::WorkerIdle { worker_id });
                });
            }

            // Only worker clones remain, so the loop ends when the last worker exits
            drop(tx);

            for message in rx {
                let job = message
                    .job_id()
                    .and_then(|id| index_by_id.get(&id))
                    .and_then(|&index| jobs.get_mut(index));
                match job {
                    Some(job) => {
                        apply_message(job, &message);
                        on_message(&message, Some(&*job));
                    }
                    None => on_message(&message, None),
                }
            }
        });

        jobs
    }
}

impl WorkerMessage {
    /// Job the message is about, if any
    pub fn job_id(&self) -> Option<Uuid> {
        match self {
            WorkerMessage::JobStarted { job_id, .. }
            | WorkerMessage::JobCompleted { job_id }
            | WorkerMessage::JobFailed { job_id, .. } => Some(*job_id),
            WorkerMessage::WorkerIdle { .. } => None,
        }
    }
}

fn apply_message(job: &mut ConversionJob, message: &WorkerMessage) {
    match message {
        WorkerMessage::JobStarted { .. } => job.status = JobStatus::Running,
        WorkerMessage::JobCompleted { .. } => job.status = JobStatus::Done,
        WorkerMessage::JobFailed { error, .. } => {
            job.status = JobStatus::Failed;
            job.last_error = Some(error.clone());
        }
        WorkerMessage::WorkerIdle { .. } => {}
    }
}
