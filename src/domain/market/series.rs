use super::price_record::EntitySeries;
use std::collections::BTreeMap;

/// Entities keyed by name. Ordered so the reference entity and matrix axes are deterministic.
pub type EntityUniverse = BTreeMap<String, EntitySeries>;

pub type ReturnUniverse = BTreeMap<String, ReturnSeries>;

pub type NormalizedUniverse = BTreeMap<String, NormalizedReturnSeries>;

/// Raw intraday returns for one entity, one value per trading day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnSeries(Vec<f64>);

impl ReturnSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for ReturnSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Output of the two-stage normalization. Same length and order as the
/// [`ReturnSeries`] it was derived from; entries may be NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedReturnSeries(Vec<f64>);

impl NormalizedReturnSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for NormalizedReturnSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Derives the return series of every entity in the universe.
pub fn returns_by_entity(universe: &EntityUniverse) -> ReturnUniverse {
    universe
        .iter()
        .map(|(name, series)| (name.clone(), series.returns()))
        .collect()
}
