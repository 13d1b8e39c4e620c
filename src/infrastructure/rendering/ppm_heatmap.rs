use super::color_scale::BluesColorScale;
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::ports::MatrixRenderer;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each matrix as a binary PPM (P6) heatmap over `[-1, 1]`.
///
/// Row `i` of the image is entity `i`; every cell is a `cell_size` square.
pub struct PpmHeatmapRenderer {
    output_dir: PathBuf,
    cell_size: usize,
    scale: BluesColorScale,
}

impl PpmHeatmapRenderer {
    pub fn new(output_dir: impl AsRef<Path>, cell_size: usize) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            cell_size: cell_size.max(1),
            scale: BluesColorScale::default(),
        }
    }

    pub fn with_scale(mut self, scale: BluesColorScale) -> Self {
        self.scale = scale;
        self
    }

    /// Encodes the image in memory.
    pub fn encode(&self, matrix: &CorrelationMatrix) -> Vec<u8> {
        let n = matrix.dim();
        let side = n * self.cell_size;
        let header = format!("P6\n{} {}\n255\n", side, side);

        let mut bytes = Vec::with_capacity(header.len() + side * side * 3);
        bytes.extend_from_slice(header.as_bytes());

        for row in 0..n {
            let line: Vec<u8> = (0..n)
                .flat_map(|col| {
                    let rgb = self.scale.color(matrix.values()[[row, col]]);
                    std::iter::repeat_n(rgb, self.cell_size).flatten()
                })
                .collect();
            for _ in 0..self.cell_size {
                bytes.extend_from_slice(&line);
            }
        }
        bytes
    }
}

impl MatrixRenderer for PpmHeatmapRenderer {
    fn render(&self, matrix: &CorrelationMatrix) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create output directory {:?}", self.output_dir))?;

        let path = self.output_dir.join(format!("{}.ppm", matrix.label()));
        fs::write(&path, self.encode(matrix)).context(format!("Failed to write {:?}", path))?;

        debug!("Rendered {} heatmap to {:?}", matrix.label(), path);
        Ok(path)
    }

    fn name(&self) -> &str {
        "ppm"
    }
}
