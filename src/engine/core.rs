mod encoder;
mod error;
mod log;
mod scan;
mod types;

pub use encoder::{Encoder, format_cmd, stderr_tail};
pub use error::ConvertError;
pub use log::{DEBUG_LOG_NAME, default_debug_log_path, write_debug_log};
pub use scan::{
    OUTPUT_EXTENSION, build_job_from_name, build_job_queue, derive_output_name,
    derive_output_path, matches_extension, probe_output, scan, scan_streaming,
};
pub use types::{BatchReport, ConversionJob, JobStatus, OutputProbe};
