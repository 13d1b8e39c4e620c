use crate::domain::errors::CorrelationError;
use crate::domain::market::{
    NormalizedReturnSeries, NormalizedUniverse, ReturnSeries, ReturnUniverse,
};
use crate::domain::statistics::{NanPolicy, SplitPartition, Stats};
use rayon::prelude::*;
use tracing::debug;

/// Default number of local chunks used for the first z-scoring stage.
pub const DEFAULT_CHUNK_COUNT: usize = 13;

/// Two-stage z-scoring of a return series.
///
/// Stage one splits the series into `chunk_count` contiguous pieces (a split
/// *count*, not a window length) and standardizes each piece by its own
/// population mean and deviation. Stage two re-standardizes the concatenated
/// result over the whole series.
pub fn normalize_returns(
    returns: &[f64],
    chunk_count: usize,
    nan_policy: NanPolicy,
) -> Result<Vec<f64>, CorrelationError> {
    if chunk_count == 0 {
        return Err(CorrelationError::InvalidParameter {
            name: "chunk_count",
            value: chunk_count,
        });
    }
    if returns.is_empty() {
        return Err(CorrelationError::EmptyInput {
            what: "return series".to_string(),
        });
    }

    let partition = SplitPartition::new(returns.len(), chunk_count);
    let mut locally_scaled = Vec::with_capacity(returns.len());
    for chunk in partition.pieces(returns) {
        // Constant or single-point chunks come out NaN; that is tolerated.
        locally_scaled.extend(Stats::zscore(chunk, NanPolicy::Propagate));
    }

    Ok(Stats::zscore(&locally_scaled, nan_policy))
}

/// Normalizes return series, one entity at a time or fanned out across entities.
#[derive(Debug, Clone)]
pub struct ReturnNormalizer {
    chunk_count: usize,
    nan_policy: NanPolicy,
    parallel: bool,
}

impl Default for ReturnNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_COUNT)
    }
}

impl ReturnNormalizer {
    pub fn new(chunk_count: usize) -> Self {
        Self {
            chunk_count,
            nan_policy: NanPolicy::default(),
            parallel: true,
        }
    }

    pub fn with_nan_policy(mut self, nan_policy: NanPolicy) -> Self {
        self.nan_policy = nan_policy;
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn nan_policy(&self) -> NanPolicy {
        self.nan_policy
    }

    pub fn normalize(
        &self,
        returns: &ReturnSeries,
    ) -> Result<NormalizedReturnSeries, CorrelationError> {
        normalize_returns(returns.values(), self.chunk_count, self.nan_policy).map(Into::into)
    }

    /// Normalizes every entity independently.
    ///
    /// Entities share no state, so with parallelism enabled each one runs on
    /// the rayon pool. The first failing entity aborts the whole call.
    pub fn normalize_all(
        &self,
        universe: &ReturnUniverse,
    ) -> Result<NormalizedUniverse, CorrelationError> {
        if universe.is_empty() {
            return Err(CorrelationError::EmptyInput {
                what: "no entities to normalize".to_string(),
            });
        }

        let normalize_one = |(name, series): (&String, &ReturnSeries)| {
            if series.is_empty() {
                return Err(CorrelationError::EmptyInput {
                    what: format!("return series for {}", name),
                });
            }
            let normalized = self.normalize(series)?;
            debug!(
                entity = %name,
                points = normalized.len(),
                undefined = normalized.values().iter().filter(|v| !v.is_finite()).count(),
                "normalized returns"
            );
            Ok((name.clone(), normalized))
        };

        if self.parallel {
            universe.par_iter().map(normalize_one).collect()
        } else {
            universe.iter().map(normalize_one).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [f64; 10] = [0.01, -0.02, 0.015, 0.005, -0.01, 0.02, 0.0, -0.005, 0.01, 0.0];

    fn moments(values: &[f64]) -> (f64, f64) {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        (Stats::mean(&finite), Stats::population_std_dev(&finite))
    }

    #[test]
    fn test_scenario_two_chunks() {
        let normalized = normalize_returns(&SCENARIO, 2, NanPolicy::Propagate).unwrap();

        assert_eq!(normalized.len(), 10);
        assert!(normalized.iter().all(|v| v.is_finite()));

        let (mean, std_dev) = moments(&normalized);
        assert!(mean.abs() < 1e-9, "mean was {}", mean);
        assert!((std_dev - 1.0).abs() < 1e-9, "std was {}", std_dev);
    }

    #[test]
    fn test_shape_preserved_for_all_chunk_counts() {
        for chunk_count in 1..=SCENARIO.len() {
            let normalized = normalize_returns(&SCENARIO, chunk_count, NanPolicy::Omit).unwrap();
            assert_eq!(normalized.len(), SCENARIO.len(), "chunk_count {}", chunk_count);
        }
    }

    #[test]
    fn test_single_chunk_matches_plain_zscore() {
        let normalized = normalize_returns(&SCENARIO, 1, NanPolicy::Propagate).unwrap();
        let direct = Stats::zscore(&SCENARIO, NanPolicy::Propagate);
        for (a, b) in normalized.iter().zip(&direct) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_chunk_is_tolerated() {
        // Second chunk is flat: its local z-scores are NaN.
        let returns = [0.01, -0.02, 0.03, 0.005, 0.005, 0.005];

        let propagated = normalize_returns(&returns, 2, NanPolicy::Propagate).unwrap();
        assert_eq!(propagated.len(), 6);
        assert!(propagated.iter().all(|v| v.is_nan()));

        let omitted = normalize_returns(&returns, 2, NanPolicy::Omit).unwrap();
        assert!(omitted[..3].iter().all(|v| v.is_finite()));
        assert!(omitted[3..].iter().all(|v| v.is_nan()));
        let (mean, std_dev) = moments(&omitted);
        assert!(mean.abs() < 1e-9);
        assert!((std_dev - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chunk_count_equal_to_length_is_all_nan() {
        let normalized = normalize_returns(&SCENARIO, SCENARIO.len(), NanPolicy::Omit).unwrap();
        assert!(normalized.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            normalize_returns(&SCENARIO, 0, NanPolicy::Propagate),
            Err(CorrelationError::InvalidParameter {
                name: "chunk_count",
                value: 0
            })
        );
        assert!(matches!(
            normalize_returns(&[], 3, NanPolicy::Propagate),
            Err(CorrelationError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_normalize_all_parallel_matches_sequential() {
        let mut universe = ReturnUniverse::new();
        universe.insert("AAPL".to_string(), ReturnSeries::new(SCENARIO.to_vec()));
        universe.insert(
            "MSFT".to_string(),
            ReturnSeries::new(SCENARIO.iter().rev().map(|r| r * 2.0).collect()),
        );

        let parallel = ReturnNormalizer::new(2).normalize_all(&universe).unwrap();
        let sequential = ReturnNormalizer::new(2)
            .with_parallelism(false)
            .normalize_all(&universe)
            .unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.len(), 2);
        assert_eq!(parallel["MSFT"].len(), 10);
    }

    #[test]
    fn test_normalize_all_names_empty_entity() {
        let mut universe = ReturnUniverse::new();
        universe.insert("AAPL".to_string(), ReturnSeries::new(SCENARIO.to_vec()));
        universe.insert("EMPTY".to_string(), ReturnSeries::default());

        let err = ReturnNormalizer::default().normalize_all(&universe).unwrap_err();
        assert!(err.to_string().contains("EMPTY"));

        let none = ReturnNormalizer::default().normalize_all(&ReturnUniverse::new());
        assert!(matches!(none, Err(CorrelationError::EmptyInput { .. })));
    }
}
