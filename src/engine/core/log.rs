use anyhow::Result;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the debug log written by `--debug-log`
pub const DEBUG_LOG_NAME: &str = "jpegify.log";

/// Default debug log location: jpegify.log in the current directory
pub fn default_debug_log_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(DEBUG_LOG_NAME))
}

/// Append a timestamped entry to the debug log, creating it if needed
pub fn write_debug_log(log_path: &Path, message: &str) -> Result<()> {
    use std::fs::OpenOptions;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // One write per entry so parallel workers don't interleave
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let entry = format!("[{}] {}\n", timestamp, message);
    file.write_all(entry.as_bytes())?;
    Ok(())
}
