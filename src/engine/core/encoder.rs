use super::error::ConvertError;
use super::log::write_debug_log;
use super::scan::probe_output;
use super::types::{ConversionJob, OutputProbe};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Lines of encoder stderr kept in a failure message
const STDERR_TAIL_LINES: usize = 10;

/// The external process that does the actual pixel conversion.
///
/// It is always called as `<program> [leading args] -i <input> <output>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    program: String,
    leading_args: Vec<String>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::ffmpeg()
    }
}

impl Encoder {
    pub fn ffmpeg() -> Self {
        Self::new("ffmpeg")
    }

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before `-i`, e.g. a script path when the program is an interpreter
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the encoder command for a job without running it
    pub fn build_cmd(&self, job: &ConversionJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg("-i")
            .arg(&job.input_path)
            .arg(&job.output_path);
        cmd
    }

    /// Run the encoder for one job and wait for it to exit.
    ///
    /// Success means exit status zero and a file at the output path. When the
    /// encoder exits non-zero, output it left behind is removed, but only if
    /// nothing was at the output path when it started.
    pub fn convert(
        &self,
        job: &ConversionJob,
        debug_log: Option<&Path>,
    ) -> Result<(), ConvertError> {
        let mut cmd = self.build_cmd(job);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let cmd_string = format_cmd(&cmd);
        tracing::debug!(command = %cmd_string, "running encoder");

        // Another job or tool may own a file that is already there
        let output_was_missing = matches!(probe_output(&job.output_path), OutputProbe::Missing);

        let output = cmd.output().map_err(|source| ConvertError::Launch {
            program: self.program.clone(),
            source,
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if let Some(log_path) = debug_log {
            let _ = write_debug_log(
                log_path,
                &format!(
                    "\n=== {} ===\n{}\nStatus: {}\nEncoder stderr:\n{}",
                    job.input_path.display(),
                    cmd_string,
                    output.status,
                    stderr
                ),
            );
        }

        if !output.status.success() {
            if output_was_missing && job.output_path.exists() {
                if let Err(e) = fs::remove_file(&job.output_path) {
                    tracing::warn!(
                        output = %job.output_path.display(),
                        error = %e,
                        "failed to remove partial output"
                    );
                }
            }
            return Err(ConvertError::Exited {
                status: output.status,
                stderr: stderr_tail(&stderr, STDERR_TAIL_LINES),
            });
        }

        if !job.output_path.exists() {
            return Err(ConvertError::MissingOutput {
                path: job.output_path.clone(),
            });
        }

        Ok(())
    }
}

/// Last `max_lines` lines of encoder stderr, trimmed
pub fn stderr_tail(stderr: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = stderr.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

/// Render a command as a shell-quoted string for logs and dry runs
pub fn format_cmd(cmd: &Command) -> String {
    let words: Vec<String> = std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|word| word.to_string_lossy().into_owned())
        .collect();

    // Interior NUL bytes can't be quoted; fall back to a plain join
    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}
