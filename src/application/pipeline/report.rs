use crate::domain::correlation::CorrelationMatrix;
use crate::domain::market::{EntityUniverse, NormalizedUniverse};
use crate::domain::statistics::NanPolicy;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of one analysis run, written as JSON on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub chunk_count: usize,
    pub window_length: usize,
    pub nan_policy: NanPolicy,
    pub reference_entity: String,
    pub reference_length: usize,
    pub entities: Vec<EntitySummary>,
    pub windows: Vec<WindowSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySummary {
    pub name: String,
    pub category: Option<String>,
    pub trading_days: usize,
    pub undefined_normalized: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSummary {
    pub window_index: usize,
    pub label: String,
    pub mean_correlation: Option<f64>,
    pub undefined_pairs: usize,
    pub artifacts: Vec<PathBuf>,
}

impl WindowSummary {
    pub fn from_matrix(matrix: &CorrelationMatrix, artifacts: Vec<PathBuf>) -> Self {
        Self {
            window_index: matrix.window_index(),
            label: matrix.label(),
            mean_correlation: matrix.mean_off_diagonal(),
            undefined_pairs: matrix.undefined_pairs(),
            artifacts,
        }
    }
}

impl EntitySummary {
    pub fn collect(entities: &EntityUniverse, normalized: &NormalizedUniverse) -> Vec<Self> {
        entities
            .values()
            .map(|series| Self {
                name: series.name.clone(),
                category: series.category.clone(),
                trading_days: series.len(),
                undefined_normalized: normalized
                    .get(&series.name)
                    .map(|n| n.values().iter().filter(|v| !v.is_finite()).count())
                    .unwrap_or(0),
            })
            .collect()
    }
}

impl AnalysisReport {
    /// Writes the report as pretty JSON via a temp file and rename.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize analysis report")?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp report file")?;
        fs::rename(&temp_path, path).context("Failed to rename temp report file")?;

        info!("Saved analysis report to {:?}", path);
        Ok(())
    }
}
