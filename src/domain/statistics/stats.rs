use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;
use std::str::FromStr;

/// How non-finite values are treated when estimating moments for a z-score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanPolicy {
    /// Any non-finite input poisons the moments, so every output is NaN.
    #[default]
    Propagate,
    /// Moments are estimated from finite inputs only; non-finite positions stay NaN.
    Omit,
}

impl FromStr for NanPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(NanPolicy::Propagate),
            "omit" => Ok(NanPolicy::Omit),
            _ => anyhow::bail!(
                "Invalid NaN policy: {}. Must be 'propagate' or 'omit'",
                s
            ),
        }
    }
}

impl fmt::Display for NanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NanPolicy::Propagate => write!(f, "propagate"),
            NanPolicy::Omit => write!(f, "omit"),
        }
    }
}

/// Shared statistics utilities for return series.
///
/// All moments are population moments (divide by `n`). Degenerate inputs
/// produce NaN rather than errors.
pub struct Stats;

impl Stats {
    /// Arithmetic mean, NaN for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        values.iter().mean()
    }

    /// Population standard deviation, NaN for an empty slice.
    ///
    /// Two-pass around the mean so a constant slice gives exactly zero.
    pub fn population_std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        let mean = Self::mean(values);
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / values.len() as f64).sqrt()
    }

    /// Standard score of every element: `(x - mean) / std`.
    ///
    /// Zero variance yields NaN (or ±inf for elements away from the mean).
    pub fn zscore(values: &[f64], policy: NanPolicy) -> Vec<f64> {
        let (mean, std_dev) = match policy {
            NanPolicy::Propagate => (Self::mean(values), Self::population_std_dev(values)),
            NanPolicy::Omit => {
                let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
                (Self::mean(&finite), Self::population_std_dev(&finite))
            }
        };

        values
            .iter()
            .map(|&v| {
                if policy == NanPolicy::Omit && !v.is_finite() {
                    f64::NAN
                } else {
                    (v - mean) / std_dev
                }
            })
            .collect()
    }

    /// Pearson correlation coefficient of two equal-length slices.
    ///
    /// NaN when the lengths differ, fewer than two points are given, either
    /// side has zero variance, or any input is NaN. Finite results are
    /// clamped to `[-1, 1]`.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let len = x.len();
        if len != y.len() || len < 2 {
            return f64::NAN;
        }

        let mean_x = Self::mean(x);
        let mean_y = Self::mean(y);

        let mut numer = 0.0;
        let mut denom_x = 0.0;
        let mut denom_y = 0.0;

        for (a, b) in x.iter().zip(y) {
            let diff_x = a - mean_x;
            let diff_y = b - mean_y;
            numer += diff_x * diff_y;
            denom_x += diff_x * diff_x;
            denom_y += diff_y * diff_y;
        }

        (numer / (denom_x.sqrt() * denom_y.sqrt())).clamp(-1.0, 1.0)
    }
}
