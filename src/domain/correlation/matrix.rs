use ndarray::Array2;

/// Pairwise Pearson correlations between entities for one time window.
///
/// Both axes are labelled by `entities`. Undefined correlations are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    window_index: usize,
    entities: Vec<String>,
    values: Array2<f64>,
}

impl CorrelationMatrix {
    /// # Panics
    /// Panics if `values` is not `entities.len()` square.
    pub fn new(window_index: usize, entities: Vec<String>, values: Array2<f64>) -> Self {
        let n = entities.len();
        assert_eq!(values.dim(), (n, n), "correlation matrix must be square over its entities");
        Self {
            window_index,
            entities,
            values,
        }
    }

    pub fn window_index(&self) -> usize {
        self.window_index
    }

    /// Artifact label, e.g. `Window_3`.
    pub fn label(&self) -> String {
        format!("Window_{}", self.window_index)
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn dim(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    pub fn position(&self, entity: &str) -> Option<usize> {
        self.entities.iter().position(|e| e == entity)
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        self.get(self.position(a)?, self.position(b)?)
    }

    /// `[i][j] == [j][i]` everywhere, treating two NaNs as equal.
    pub fn is_symmetric(&self) -> bool {
        let n = self.dim();
        (0..n).all(|i| {
            (i..n).all(|j| {
                let a = self.values[[i, j]];
                let b = self.values[[j, i]];
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }

    /// Number of unordered off-diagonal pairs whose correlation is undefined.
    pub fn undefined_pairs(&self) -> usize {
        let n = self.dim();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.values[[i, j]].is_nan())
            .count()
    }

    /// Mean of the defined off-diagonal correlations, `None` if there are none.
    pub fn mean_off_diagonal(&self) -> Option<f64> {
        let n = self.dim();
        let defined: Vec<f64> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| self.values[[i, j]])
            .filter(|v| v.is_finite())
            .collect();

        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }
}
