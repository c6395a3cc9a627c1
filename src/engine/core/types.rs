use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
    Skipped, // Output already existed before the run
}

impl JobStatus {
    /// True once the job will not change state again
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed | JobStatus::Skipped)
    }
}

#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub id: Uuid,
    /// Directory entry name the job was built from
    pub file_name: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: JobStatus,
    pub last_error: Option<String>,
}

impl ConversionJob {
    /// Create a new pending job
    pub fn new(file_name: String, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            input_path,
            output_path,
            status: JobStatus::Pending,
            last_error: None,
        }
    }
}

/// Result of probing a prospective output path
#[derive(Debug)]
pub enum OutputProbe {
    Exists,
    Missing,
    /// The probe failed for a reason other than "not found" (e.g. permission denied)
    Unknown(std::io::Error),
}

impl OutputProbe {
    pub fn exists(&self) -> bool {
        matches!(self, OutputProbe::Exists)
    }
}

/// Final state of every job in a run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub jobs: Vec<ConversionJob>,
}

impl BatchReport {
    pub fn new(jobs: Vec<ConversionJob>) -> Self {
        Self { jobs }
    }

    /// No entry matched the extension filter
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.jobs.iter().filter(|job| job.status == status).count()
    }

    pub fn converted(&self) -> usize {
        self.count(JobStatus::Done)
    }

    pub fn failed(&self) -> usize {
        self.count(JobStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(JobStatus::Skipped)
    }

    /// Jobs that were planned but not run, as in a dry run
    pub fn pending(&self) -> usize {
        self.count(JobStatus::Pending)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}
