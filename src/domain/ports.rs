use crate::domain::correlation::CorrelationMatrix;
use crate::domain::market::EntityUniverse;
use anyhow::Result;
use std::path::PathBuf;

/// Source of per-entity daily price history.
pub trait PriceSeriesLoader: Send + Sync {
    /// Every entity with its records ascending by date.
    fn load_entities(&self) -> Result<EntityUniverse>;
}

/// Turns one window's matrix into a persisted artifact.
pub trait MatrixRenderer: Send + Sync {
    /// Writes the artifact for `matrix` and returns its path.
    ///
    /// Must tolerate NaN cells.
    fn render(&self, matrix: &CorrelationMatrix) -> Result<PathBuf>;

    fn name(&self) -> &str;
}
