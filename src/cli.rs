//! CLI parsing and orchestration. Loads config, builds the tree from the API, writes nested or flat JSON. Maps errors to exit codes.

use crate::config::{self, Config};
use crate::formats::{write_output, FormatError, OutputShape};
use crate::source::municode::MunicodeSource;
use crate::source::{ApiClient, JobContext, SourceError};
use crate::tree::{build_tree, BuildOptions};
use clap::Parser;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Format(#[from] FormatError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Source(_) => 2,
            CliRunError::Format(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ordsync")]
#[command(about = "Fetch a code of ordinances from the Municode API and write it as JSON")]
#[command(
    after_help = "Config file keys (base_url, browse_url, job_id, product_id, cookie, user_agent, headers, request_delay_ms, timeout_secs, output) are read from ./ordsync.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// Write a flattened list of sections with hierarchy metadata instead of nested chapters.
    #[arg(long)]
    pub flat: bool,

    /// Output path. Default: assets/data/ordinances.json (or `output` from config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn shape(&self) -> OutputShape {
        if self.flat {
            OutputShape::Flat
        } else {
            OutputShape::Nested
        }
    }
}

fn job_context(config: &Config) -> JobContext {
    JobContext {
        job_id: config.job_id().to_string(),
        product_id: config.product_id().to_string(),
        browse_url: config.browse_url().to_string(),
    }
}

/// Build the HTTP client from config. Header problems are config errors, not network ones.
fn build_client(config: &Config) -> Result<ApiClient, CliRunError> {
    let mut builder = ApiClient::builder().timeout_secs(config.timeout_secs());
    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    match config.cookie.as_deref().map(str::trim) {
        Some(cookie) if !cookie.is_empty() => builder = builder.cookie(cookie),
        _ => log::warn!("No cookie configured; the API may reject requests"),
    }
    for (name, value) in config.request_headers() {
        builder = builder.header(name, value);
    }
    builder.build().map_err(|e| match e {
        SourceError::InvalidHeader { .. } => CliRunError::InvalidInput(e.to_string()),
        other => CliRunError::Source(other),
    })
}

fn progress_bar(total: u32) -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new(u64::from(total));
    match indicatif::ProgressStyle::default_bar()
        .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
    {
        Ok(style) => bar.set_style(
            style
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .progress_chars("█▉▊▋▌▍▎▏ "),
        ),
        Err(e) => log::debug!("Progress template rejected: {}", e),
    }
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config()
        .map_err(CliRunError::InvalidInput)?
        .unwrap_or_default();
    let output_path = args.output.clone().unwrap_or_else(|| config.output());
    let shape = args.shape();

    let client = build_client(&config)?;
    let mut source = MunicodeSource::new(&client, config.base_url(), job_context(&config));

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |n: u32, total: u32| {
        if total == 0 {
            return;
        }
        let mut state = progress_state.borrow_mut();
        let pb = state.get_or_insert_with(|| progress_bar(total));
        pb.set_position(u64::from(n));
        pb.set_message(format!("Fetching section {}/{}", n, total));
    };
    let progress: Option<&dyn Fn(u32, u32)> = if args.quiet { None } else { Some(&progress_cb) };
    let options = BuildOptions {
        progress,
        pacing: Duration::from_millis(config.request_delay_ms()),
        sleep: None,
    };

    let built = build_tree(&mut source, &options);
    if let Some(pb) = progress_state.borrow_mut().take() {
        pb.disable_steady_tick();
        pb.finish_and_clear();
    }
    let chapters = built?;

    let count = write_output(&chapters, shape, &output_path)?;
    let line = summary(count, shape, &output_path);
    log::info!("{}", line);
    if !args.quiet {
        eprintln!("{}", line);
    }
    Ok(())
}

/// Final report line, shared by the log and stderr.
fn summary(count: usize, shape: OutputShape, path: &Path) -> String {
    format!("Wrote {} {} to {}", count, shape.label(), path.display())
}
