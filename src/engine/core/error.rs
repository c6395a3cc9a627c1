use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Why a single conversion failed
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The encoder process could not be started at all
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The encoder ran and exited unsuccessfully; `stderr` holds the tail of its error stream
    #[error("encoder exited with {status}: {stderr}")]
    Exited { status: ExitStatus, stderr: String },

    /// The encoder exited zero but left nothing at the output path
    #[error("encoder exited successfully but no output was written to {}", path.display())]
    MissingOutput { path: PathBuf },
}
