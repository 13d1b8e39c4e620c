use crate::domain::correlation::CorrelationMatrix;
use crate::domain::ports::MatrixRenderer;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each matrix as a labelled CSV grid. Undefined cells are written as `NaN`.
pub struct CsvMatrixRenderer {
    output_dir: PathBuf,
}

impl CsvMatrixRenderer {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl MatrixRenderer for CsvMatrixRenderer {
    fn render(&self, matrix: &CorrelationMatrix) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Failed to create output directory {:?}", self.output_dir))?;

        let path = self.output_dir.join(format!("{}.csv", matrix.label()));
        let mut wtr = csv::Writer::from_path(&path).context(format!("Failed to create {:?}", path))?;

        let header = std::iter::once("entity").chain(matrix.entities().iter().map(String::as_str));
        wtr.write_record(header)?;

        for (entity, row) in matrix.entities().iter().zip(matrix.values().rows()) {
            let record = std::iter::once(entity.clone()).chain(row.iter().map(|v| v.to_string()));
            wtr.write_record(record)?;
        }
        wtr.flush().context(format!("Failed to flush {:?}", path))?;

        debug!("Rendered {} grid to {:?}", matrix.label(), path);
        Ok(path)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_render_grid_with_nan() {
        let dir = std::env::temp_dir().join(format!("rustcorr_test_{}_csv", std::process::id()));
        let matrix = CorrelationMatrix::new(
            0,
            vec!["AAPL".to_string(), "MSFT".to_string()],
            array![[1.0, 0.25], [0.25, f64::NAN]],
        );

        let path = CsvMatrixRenderer::new(&dir).render(&matrix).unwrap();
        assert!(path.ends_with("Window_0.csv"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["entity,AAPL,MSFT", "AAPL,1,0.25", "MSFT,0.25,NaN"]);

        fs::remove_dir_all(dir).ok();
    }
}
