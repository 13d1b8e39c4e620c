//! Output configuration parsing from environment variables.

use super::parse_var;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Which artifacts are written per window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Ppm,
    Csv,
    Both,
}

impl FromStr for RenderFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ppm" => Ok(RenderFormat::Ppm),
            "csv" => Ok(RenderFormat::Csv),
            "both" => Ok(RenderFormat::Both),
            _ => anyhow::bail!(
                "Invalid render format: {}. Must be 'ppm', 'csv', or 'both'",
                s
            ),
        }
    }
}

/// Output environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OutputEnvConfig {
    pub output_dir: PathBuf,
    pub render_format: RenderFormat,
    pub cell_size: usize,
}

impl Default for OutputEnvConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("correlation_output"),
            render_format: RenderFormat::Ppm,
            cell_size: 16,
        }
    }
}

impl OutputEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            output_dir: lookup("CORR_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            render_format: parse_var(lookup, "CORR_RENDER_FORMAT", defaults.render_format)?,
            cell_size: parse_var(lookup, "CORR_CELL_SIZE", defaults.cell_size)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_config_defaults() {
        let config = OutputEnvConfig::from_lookup(&|_: &str| None).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("correlation_output"));
        assert_eq!(config.render_format, RenderFormat::Ppm);
        assert_eq!(config.cell_size, 16);
    }

    #[test]
    fn test_render_format_from_str() {
        assert_eq!("CSV".parse::<RenderFormat>().unwrap(), RenderFormat::Csv);
        assert_eq!("both".parse::<RenderFormat>().unwrap(), RenderFormat::Both);
        assert!("png".parse::<RenderFormat>().is_err());
    }
}
