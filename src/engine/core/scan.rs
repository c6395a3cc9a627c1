use super::types::{ConversionJob, JobStatus, OutputProbe};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension every output file gets
pub const OUTPUT_EXTENSION: &str = ".jpg";

/// Case-sensitive literal suffix match
pub fn matches_extension(file_name: &str, extension: &str) -> bool {
    file_name.ends_with(extension)
}

/// Replace the first occurrence of `extension` in `file_name` with `.jpg`.
///
/// This is a textual replace, not a suffix replace: `a.png.bak.png` becomes
/// `a.jpg.bak.png` for the extension `.png`.
pub fn derive_output_name(file_name: &str, extension: &str) -> String {
    file_name.replacen(extension, OUTPUT_EXTENSION, 1)
}

/// Output path for a directory entry: same directory, extension replaced
pub fn derive_output_path(dir: &Path, file_name: &str, extension: &str) -> PathBuf {
    dir.join(derive_output_name(file_name, extension))
}

/// List the directory (non-recursive) and invoke a callback for each matching entry name.
/// Entries are reported in listing order.
pub fn scan_streaming<F>(dir: &Path, extension: &str, mut on_match: F) -> Result<()>
where
    F: FnMut(String),
{
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if matches_extension(&name, extension) {
            on_match(name);
        }
    }

    Ok(())
}

/// Names of the entries directly under `dir` that end with `extension`
pub fn scan(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    scan_streaming(dir, extension, |name| names.push(name))?;
    Ok(names)
}

/// Existence probe for an output path.
/// Only "not found" counts as missing; other failures are reported as `Unknown`.
pub fn probe_output(path: &Path) -> OutputProbe {
    match fs::metadata(path) {
        Ok(_) => OutputProbe::Exists,
        Err(e) if e.kind() == ErrorKind::NotFound => OutputProbe::Missing,
        Err(e) => OutputProbe::Unknown(e),
    }
}

/// Build a job for one matching entry.
/// The job is marked Skipped when its output already exists.
pub fn build_job_from_name(dir: &Path, file_name: String, extension: &str) -> ConversionJob {
    let input_path = dir.join(&file_name);
    let output_path = derive_output_path(dir, &file_name, extension);
    let mut job = ConversionJob::new(file_name, input_path, output_path);

    match probe_output(&job.output_path) {
        OutputProbe::Exists => job.status = JobStatus::Skipped,
        OutputProbe::Missing => {}
        OutputProbe::Unknown(e) => {
            // Can't tell, so convert anyway
            tracing::warn!(
                output = %job.output_path.display(),
                error = %e,
                "could not check for existing output, converting anyway"
            );
        }
    }

    job
}

pub fn build_job_queue(dir: &Path, names: Vec<String>, extension: &str) -> Vec<ConversionJob> {
    names
        .into_iter()
        .map(|name| build_job_from_name(dir, name, extension))
        .collect()
}
