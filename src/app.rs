use crate::cli::Cli;
use anyhow::Result;
use jpegify::engine::{self, BatchReport};
use jpegify::config::Config;
use std::process::ExitCode;

/// Settings for one run after merging CLI flags over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub max_workers: usize,
    pub fail_on_error: bool,
    pub debug_log: bool,
}

impl RunSettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            max_workers: cli.jobs.unwrap_or(config.defaults.max_workers).max(1),
            fail_on_error: cli.strict || config.defaults.fail_on_error,
            debug_log: cli.debug_log || config.defaults.debug_log,
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    tracing::info!(path = %cli.path.display(), extension = %cli.extension, "arguments");

    let config = load_config(&cli)?;
    let settings = RunSettings::resolve(&cli, &config);

    if cli.dry_run {
        return handle_dry_run(&cli);
    }

    let mut options = engine::BatchOptions::new(&cli.path, &cli.extension);
    options.max_workers = settings.max_workers;
    if settings.debug_log {
        options.debug_log = Some(engine::default_debug_log_path()?);
    }

    let report = engine::run_batch(&options)?;
    if report.is_empty() {
        print_no_images(&cli.extension);
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!(
        converted = report.converted(),
        failed = report.failed(),
        skipped = report.skipped(),
        "done"
    );

    if settings.fail_on_error && report.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_dry_run(cli: &Cli) -> Result<ExitCode> {
    let report = dry_run_report(cli)?;
    if report.is_empty() {
        print_no_images(&cli.extension);
        return Ok(ExitCode::SUCCESS);
    }

    let encoder = engine::Encoder::default();
    for job in &report.jobs {
        match job.status {
            engine::JobStatus::Skipped => {
                println!("{} already processed.", job.input_path.display())
            }
            _ => println!("{}", engine::format_cmd(&encoder.build_cmd(job))),
        }
    }

    tracing::info!(
        planned = report.pending(),
        skipped = report.skipped(),
        "dry run, nothing converted"
    );
    Ok(ExitCode::SUCCESS)
}

/// Planned jobs for a dry run; nothing leaves Pending or Skipped
fn dry_run_report(cli: &Cli) -> Result<BatchReport> {
    let jobs = engine::plan_batch(&cli.path, &cli.extension)?;
    Ok(BatchReport::new(jobs))
}

fn print_no_images(extension: &str) {
    println!("No {} images found in the specified directory.", extension);
}
