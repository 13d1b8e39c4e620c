//! Window configuration parsing from environment variables.
//!
//! Holds the two size parameters of the analysis. They mean different
//! things and are never derived from each other:
//! - `chunk_count`: how many pieces the normalizer splits each series into
//! - `window_length`: how many trading days each correlation window spans

use super::parse_var;
use crate::application::correlation::DEFAULT_WINDOW_LENGTH;
use crate::application::normalization::DEFAULT_CHUNK_COUNT;
use crate::domain::statistics::NanPolicy;
use anyhow::Result;

/// Window environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEnvConfig {
    pub chunk_count: usize,
    pub window_length: usize,
    pub nan_policy: NanPolicy,
    pub parallel: bool,
}

impl Default for WindowEnvConfig {
    fn default() -> Self {
        Self {
            chunk_count: DEFAULT_CHUNK_COUNT,
            window_length: DEFAULT_WINDOW_LENGTH,
            nan_policy: NanPolicy::Propagate,
            parallel: true,
        }
    }
}

impl WindowEnvConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            chunk_count: parse_var(lookup, "CORR_CHUNK_COUNT", defaults.chunk_count)?,
            window_length: parse_var(lookup, "CORR_WINDOW_LENGTH", defaults.window_length)?,
            nan_policy: parse_var(lookup, "CORR_NAN_POLICY", defaults.nan_policy)?,
            parallel: parse_var(lookup, "CORR_PARALLEL", defaults.parallel)?,
        })
    }
}
