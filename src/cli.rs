use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jpegify", version)]
#[command(about = "Convert every image with a given extension in a directory to JPEG", long_about = None)]
pub struct Cli {
    /// Image directory
    #[arg(long, value_name = "DIR")]
    pub path: PathBuf,

    /// Image extension to convert, including the dot (e.g. .png)
    #[arg(long, value_name = "EXT", allow_hyphen_values = true)]
    pub extension: String,

    /// Maximum number of ffmpeg processes at once (overrides config)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Show ffmpeg commands without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with a failure status if any file fails to convert (overrides config)
    #[arg(long)]
    pub strict: bool,

    /// Append ffmpeg commands and output to jpegify.log (overrides config)
    #[arg(long)]
    pub debug_log: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
