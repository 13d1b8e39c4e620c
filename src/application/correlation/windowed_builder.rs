use crate::domain::correlation::CorrelationMatrix;
use crate::domain::errors::CorrelationError;
use crate::domain::market::NormalizedUniverse;
use crate::domain::statistics::{SplitPartition, Stats};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

/// Default number of trading days per correlation window.
pub const DEFAULT_WINDOW_LENGTH: usize = 44;

/// One entity's normalized series cut into its windows.
///
/// Built once per entity and shared by every pair and window.
#[derive(Debug, Clone)]
pub struct WindowedPartition<'a> {
    series: &'a [f64],
    partition: SplitPartition,
}

impl<'a> WindowedPartition<'a> {
    /// Splits `series` into `floor(len / window_length)` pieces of roughly
    /// `window_length` points each.
    pub fn new(series: &'a [f64], window_length: usize) -> Self {
        let pieces = series.len() / window_length.max(1);
        Self {
            series,
            partition: SplitPartition::new(series.len(), pieces),
        }
    }

    pub fn window_count(&self) -> usize {
        self.partition.piece_count()
    }

    /// Segment for `window`, empty when the window does not exist.
    pub fn segment(&self, window: usize) -> &'a [f64] {
        self.partition.piece(self.series, window).unwrap_or(&[])
    }
}

/// Builds one correlation matrix per non-overlapping time window.
///
/// `window_length` is a target segment *length*; the number of windows is
/// derived from the reference (first) entity's series length.
#[derive(Debug, Clone)]
pub struct WindowedCorrelationBuilder {
    window_length: usize,
    parallel: bool,
}

impl Default for WindowedCorrelationBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_LENGTH)
    }
}

impl WindowedCorrelationBuilder {
    pub fn new(window_length: usize) -> Self {
        Self {
            window_length,
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn windows_count(&self, reference_length: usize) -> usize {
        reference_length / self.window_length.max(1)
    }

    /// Correlation matrices for every window, in window order.
    ///
    /// All entities must have the reference entity's length; otherwise the
    /// windows would not line up and `MismatchedLength` names the first
    /// offender. Segments shorter than two points yield NaN for every pair
    /// that touches them.
    pub fn build_matrices(
        &self,
        universe: &NormalizedUniverse,
    ) -> Result<Vec<CorrelationMatrix>, CorrelationError> {
        if self.window_length == 0 {
            return Err(CorrelationError::InvalidParameter {
                name: "window_length",
                value: self.window_length,
            });
        }

        let (reference_entity, reference) =
            universe.iter().next().ok_or_else(|| CorrelationError::EmptyInput {
                what: "no entities to correlate".to_string(),
            })?;
        let reference_length = reference.len();

        for (name, series) in universe {
            if series.is_empty() {
                return Err(CorrelationError::EmptyInput {
                    what: format!("normalized series for {}", name),
                });
            }
            if series.len() != reference_length {
                return Err(CorrelationError::MismatchedLength {
                    entity: name.clone(),
                    length: series.len(),
                    reference_entity: reference_entity.clone(),
                    reference_length,
                });
            }
        }

        let windows_count = self.windows_count(reference_length);
        let entities: Vec<String> = universe.keys().cloned().collect();
        let partitions: Vec<WindowedPartition<'_>> = universe
            .values()
            .map(|series| WindowedPartition::new(series.values(), self.window_length))
            .collect();

        debug!(
            entities = entities.len(),
            reference = %reference_entity,
            reference_length,
            window_length = self.window_length,
            windows_count,
            "building correlation matrices"
        );

        let build = |window: usize| Self::build_window(window, &entities, &partitions);
        let matrices: Vec<CorrelationMatrix> = if self.parallel {
            (0..windows_count).into_par_iter().map(build).collect()
        } else {
            (0..windows_count).map(build).collect()
        };

        Ok(matrices)
    }

    fn build_window(
        window: usize,
        entities: &[String],
        partitions: &[WindowedPartition<'_>],
    ) -> CorrelationMatrix {
        let n = partitions.len();
        let mut values = Array2::from_elem((n, n), f64::NAN);

        for i in 0..n {
            let seg_i = partitions[i].segment(window);
            for j in i..n {
                let seg_j = partitions[j].segment(window);
                let corr = if seg_i.len() > 1 && seg_j.len() > 1 {
                    Stats::pearson(seg_i, seg_j)
                } else {
                    f64::NAN
                };
                values[[i, j]] = corr;
                values[[j, i]] = corr;
            }
        }

        CorrelationMatrix::new(window, entities.to_vec(), values)
    }
}

/// Convenience wrapper over [`WindowedCorrelationBuilder::build_matrices`].
pub fn build_correlation_matrices(
    universe: &NormalizedUniverse,
    window_length: usize,
) -> Result<Vec<CorrelationMatrix>, CorrelationError> {
    WindowedCorrelationBuilder::new(window_length).build_matrices(universe)
}
