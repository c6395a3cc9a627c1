// Tests for worker pool and message handling

use crate::common::helpers::job;
use jpegify::engine::{
    ConvertError, JobStatus,
    worker::{WorkerMessage, WorkerPool},
};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_worker_pool_initialization() {
    let pool = WorkerPool::new(3);
    assert_eq!(pool.max_workers(), 3, "Pool should have max_workers set to 3");

    let pool = WorkerPool::new(0);
    assert_eq!(pool.max_workers(), 1, "Zero workers should be clamped to 1");
}

#[test]
fn test_concurrency_never_exceeds_max_workers() {
    let pool = WorkerPool::new(3);
    let jobs: Vec<_> = (0..12).map(|i| job(&format!("img{}.png", i))).collect();

    let active = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    let finished = pool.run(
        jobs,
        |_job| {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        },
        |_, _| {},
    );

    assert!(
        peak.load(Ordering::SeqCst) <= 3,
        "peak concurrency {} above limit",
        peak.load(Ordering::SeqCst)
    );
    assert_eq!(active.load(Ordering::SeqCst), 0, "run returns only after all jobs");
    assert!(finished.iter().all(|job| job.status == JobStatus::Done));
}

#[test]
fn test_non_pending_jobs_are_not_run() {
    let pool = WorkerPool::new(2);
    let mut jobs = vec![job("a.png"), job("b.png"), job("c.png")];
    jobs[1].status = JobStatus::Skipped;

    let seen = Mutex::new(Vec::new());
    let finished = pool.run(
        jobs,
        |job| {
            seen.lock().unwrap().push(job.file_name.clone());
            Ok(())
        },
        |_, _| {},
    );

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec!["a.png", "c.png"]);
    assert_eq!(finished[1].status, JobStatus::Skipped);
    assert_eq!(finished[0].status, JobStatus::Done);
    assert_eq!(finished[2].status, JobStatus::Done);
}

#[test]
fn test_all_skipped_runs_nothing() {
    let pool = WorkerPool::new(4);
    let mut jobs = vec![job("a.png"), job("b.png")];
    for job in &mut jobs {
        job.status = JobStatus::Skipped;
    }

    let messages = AtomicUsize::new(0);
    let finished = pool.run(
        jobs,
        |_| panic!("nothing should run"),
        |_, _| {
            messages.fetch_add(1, Ordering::SeqCst);
        },
    );

    assert_eq!(messages.load(Ordering::SeqCst), 0);
    assert!(finished.iter().all(|job| job.status == JobStatus::Skipped));
}

#[test]
fn test_failure_is_recorded_per_job() {
    let pool = WorkerPool::new(3);
    let jobs = vec![job("ok1.png"), job("bad.png"), job("ok2.png")];

    let finished = pool.run(
        jobs,
        |job| {
            if job.file_name == "bad.png" {
                Err(ConvertError::MissingOutput {
                    path: PathBuf::from("bad.jpg"),
                })
            } else {
                Ok(())
            }
        },
        |_, _| {},
    );

    assert_eq!(finished[0].status, JobStatus::Done);
    assert_eq!(finished[1].status, JobStatus::Failed);
    assert_eq!(finished[2].status, JobStatus::Done);
    assert!(finished[1].last_error.as_deref().unwrap().contains("bad.jpg"));
    assert!(finished[0].last_error.is_none());
}

#[test]
fn test_single_worker_runs_in_queue_order() {
    let pool = WorkerPool::new(1);
    let names = ["c.png", "a.png", "b.png"];
    let jobs: Vec<_> = names.iter().map(|name| job(name)).collect();

    let mut started = Vec::new();
    pool.run(
        jobs,
        |_| Ok(()),
        |message, job| {
            if let (WorkerMessage::JobStarted { .. }, Some(job)) = (message, job) {
                started.push(job.file_name.clone());
            }
        },
    );

    assert_eq!(started, names);
}

#[test]
fn test_message_sequence() {
    let pool = WorkerPool::new(2);
    let jobs: Vec<_> = (0..5).map(|i| job(&format!("{}.png", i))).collect();

    let mut started = 0;
    let mut completed = 0;
    let mut idle = 0;
    pool.run(
        jobs,
        |_| Ok(()),
        |message, job| match message {
            WorkerMessage::JobStarted { .. } => {
                assert_eq!(job.unwrap().status, JobStatus::Running);
                started += 1;
            }
            WorkerMessage::JobCompleted { .. } => {
                assert_eq!(job.unwrap().status, JobStatus::Done);
                completed += 1;
            }
            WorkerMessage::JobFailed { .. } => panic!("no job should fail"),
            WorkerMessage::WorkerIdle { .. } => {
                assert!(job.is_none());
                idle += 1;
            }
        },
    );

    assert_eq!(started, 5);
    assert_eq!(completed, 5);
    assert_eq!(idle, 2, "one idle message per worker");
}

#[test]
fn test_worker_message_job_id() {
    use uuid::Uuid;

    let job_id = Uuid::new_v4();
    assert_eq!(
        WorkerMessage::JobStarted { job_id, worker_id: 0 }.job_id(),
        Some(job_id)
    );
    assert_eq!(WorkerMessage::JobCompleted { job_id }.job_id(), Some(job_id));
    assert_eq!(
        WorkerMessage::JobFailed {
            job_id,
            error: "boom".to_string()
        }
        .job_id(),
        Some(job_id)
    );
    assert_eq!(WorkerMessage::WorkerIdle { worker_id: 1 }.job_id(), None);
}
