use jpegify::engine::{BatchOptions, ConversionJob, Encoder};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for ffmpeg, run through `sh` so the script never needs the exec bit.
///
/// Like ffmpeg without `-y`, it refuses to overwrite an existing output and
/// exits 1. Otherwise behaviour depends on the input file name:
/// - contains "fail": prints a diagnostic and exits 1
/// - contains "silent": exits 0 without writing anything
/// - contains "partial": writes a truncated output, then exits 1
/// - anything else: copies input to output
///
/// Every invocation appends the input name to `calls.log` beside the script.
const MOCK_ENCODER: &str = r#"#!/bin/sh
in="$2"
out="$3"
name=$(basename "$in")
echo "$name" >> "$(dirname "$0")/calls.log"

if [ -e "$out" ]; then
  echo "File '$out' already exists. Exiting." >&2
  exit 1
fi

case "$name" in
  *fail*)
    echo "mock encoder: starting" >&2
    echo "mock encoder: cannot decode $name" >&2
    exit 1
    ;;
  *silent*)
    exit 0
    ;;
  *partial*)
    printf 'trunc' > "$out"
    echo "mock encoder: truncated $name" >&2
    exit 1
    ;;
esac

cp "$in" "$out"
"#;

/// A mock encoder installed in its own temp directory
pub struct MockEncoder {
    dir: TempDir,
}

impl MockEncoder {
    pub fn install() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mock_encoder.sh"), MOCK_ENCODER).unwrap();
        Self { dir }
    }

    pub fn encoder(&self) -> Encoder {
        let script = self.dir.path().join("mock_encoder.sh");
        Encoder::new("sh").with_leading_args([script.to_string_lossy().into_owned()])
    }

    /// Input file names the encoder was called with, in call order
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Create a directory of fake images
pub fn image_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(name), format!("fake image {}", name)).unwrap();
    }
    dir
}

/// Batch options for `dir` using the mock encoder
pub fn mock_options(dir: &Path, extension: &str, mock: &MockEncoder) -> BatchOptions {
    let mut options = BatchOptions::new(dir, extension);
    options.encoder = mock.encoder();
    options.max_workers = 2;
    options
}

pub fn job(name: &str) -> ConversionJob {
    ConversionJob::new(
        name.to_string(),
        PathBuf::from(name),
        PathBuf::from(name.replacen(".png", ".jpg", 1)),
    )
}

pub fn find<'a>(jobs: &'a [ConversionJob], file_name: &str) -> &'a ConversionJob {
    jobs.iter()
        .find(|job| job.file_name == file_name)
        .unwrap_or_else(|| panic!("no job for {}", file_name))
}
