//! Configuration module for the correlation analysis.
//!
//! Settings are layered: built-in defaults, then environment variables
//! (a `.env` file is honoured by the binary), then an optional TOML file,
//! then command-line flags.

mod output_config;
mod window_config;

pub use output_config::{OutputEnvConfig, RenderFormat};
pub use window_config::WindowEnvConfig;

use crate::domain::statistics::NanPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parses `key` through `lookup`, falling back to `default` when unset.
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={}: {}", key, raw, e)),
        None => Ok(default),
    }
}

/// Main analysis configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    // Input
    pub data_dir: PathBuf,

    // Windows (from WindowEnvConfig)
    pub chunk_count: usize,
    pub window_length: usize,
    pub nan_policy: NanPolicy,
    pub parallel: bool,

    // Output (from OutputEnvConfig)
    pub output_dir: PathBuf,
    pub render_format: RenderFormat,
    pub cell_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let window = WindowEnvConfig::default();
        let output = OutputEnvConfig::default();
        Self {
            data_dir: PathBuf::from("data"),
            chunk_count: window.chunk_count,
            window_length: window.window_length,
            nan_policy: window.nan_policy,
            parallel: window.parallel,
            output_dir: output.output_dir,
            render_format: output.render_format,
            cell_size: output.cell_size,
        }
    }
}

/// Optional overrides read from a TOML file. Absent keys keep the current value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverlay {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub chunk_count: Option<usize>,
    pub window_length: Option<usize>,
    pub nan_policy: Option<NanPolicy>,
    pub parallel: Option<bool>,
    pub render_format: Option<RenderFormat>,
    pub cell_size: Option<usize>,
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window = WindowEnvConfig::from_lookup(lookup).context("Failed to load window config")?;
        let output = OutputEnvConfig::from_lookup(lookup).context("Failed to load output config")?;

        let config = Self {
            data_dir: lookup("CORR_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            chunk_count: window.chunk_count,
            window_length: window.window_length,
            nan_policy: window.nan_policy,
            parallel: window.parallel,
            output_dir: output.output_dir,
            render_format: output.render_format,
            cell_size: output.cell_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies a TOML overlay file on top of the current values.
    pub fn apply_toml_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let overlay: ConfigOverlay =
            toml::from_str(&content).context(format!("Failed to parse config TOML: {:?}", path))?;
        self.apply_overlay(overlay);
        self.validate()
    }

    pub fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.data_dir {
            self.data_dir = v;
        }
        if let Some(v) = overlay.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = overlay.chunk_count {
            self.chunk_count = v;
        }
        if let Some(v) = overlay.window_length {
            self.window_length = v;
        }
        if let Some(v) = overlay.nan_policy {
            self.nan_policy = v;
        }
        if let Some(v) = overlay.parallel {
            self.parallel = v;
        }
        if let Some(v) = overlay.render_format {
            self.render_format = v;
        }
        if let Some(v) = overlay.cell_size {
            self.cell_size = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_count == 0 {
            anyhow::bail!("chunk_count must be at least 1");
        }
        if self.window_length == 0 {
            anyhow::bail!("window_length must be at least 1");
        }
        if self.cell_size == 0 {
            anyhow::bail!("cell_size must be at least 1");
        }
        Ok(())
    }
}
