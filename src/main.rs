//! rustcorr - windowed correlation analysis of daily price series
//!
//! Reads `<data-dir>/<category>/<entity>.csv`, normalizes each entity's
//! intraday returns, and writes one correlation heatmap per time window.
//!
//! # Usage
//! ```sh
//! cargo run -- --data-dir data/pure --window-length 44 --chunk-count 13 --format both
//! ```
//!
//! # Environment Variables
//! - `CORR_DATA_DIR`, `CORR_OUTPUT_DIR` - input and output locations
//! - `CORR_CHUNK_COUNT` - normalizer split count (default: 13)
//! - `CORR_WINDOW_LENGTH` - trading days per correlation window (default: 44)
//! - `CORR_NAN_POLICY`, `CORR_RENDER_FORMAT`, `CORR_PARALLEL`, `CORR_CELL_SIZE`

use anyhow::Result;
use clap::Parser;
use rustcorr::application::pipeline::AnalysisPipeline;
use rustcorr::config::{AnalysisConfig, RenderFormat};
use rustcorr::domain::statistics::NanPolicy;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root directory holding one sub-directory of CSV files per category
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the Window_<n> artifacts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of pieces each return series is split into for local z-scoring
    #[arg(long)]
    chunk_count: Option<usize>,

    /// Trading days per correlation window
    #[arg(long)]
    window_length: Option<usize>,

    /// Artifact format: ppm, csv or both
    #[arg(long)]
    format: Option<RenderFormat>,

    /// NaN handling in the global z-score: propagate or omit
    #[arg(long)]
    nan_policy: Option<NanPolicy>,

    /// Pixel size of one matrix cell in PPM output
    #[arg(long)]
    cell_size: Option<usize>,

    /// Disable the rayon fan-out
    #[arg(long)]
    sequential: bool,

    /// TOML file overriding environment settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut AnalysisConfig) {
        if let Some(v) = self.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.chunk_count {
            config.chunk_count = v;
        }
        if let Some(v) = self.window_length {
            config.window_length = v;
        }
        if let Some(v) = self.format {
            config.render_format = v;
        }
        if let Some(v) = self.nan_policy {
            config.nan_policy = v;
        }
        if let Some(v) = self.cell_size {
            config.cell_size = v;
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    info!("rustcorr {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = AnalysisConfig::from_env()?;
    if let Some(path) = &args.config {
        config.apply_toml_file(path)?;
    }
    let summary_path = args.summary.clone();
    args.apply(&mut config);
    config.validate()?;

    info!(
        "Configuration loaded: data_dir={:?}, output_dir={:?}, chunk_count={}, window_length={}, format={:?}",
        config.data_dir, config.output_dir, config.chunk_count, config.window_length, config.render_format
    );

    let pipeline = AnalysisPipeline::from_config(&config);
    let report = pipeline.run()?;

    for window in &report.windows {
        match window.mean_correlation {
            Some(mean) => info!(
                "{}: mean correlation {:.4}, {} undefined pairs",
                window.label, mean, window.undefined_pairs
            ),
            None => info!("{}: no defined correlations", window.label),
        }
    }

    if let Some(path) = summary_path {
        report.write_json(&path)?;
    }

    info!(
        "Done: {} entities, {} windows written to {:?}",
        report.entities.len(),
        report.windows.len(),
        config.output_dir
    );
    Ok(())
}
