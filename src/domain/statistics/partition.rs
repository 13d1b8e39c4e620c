use std::ops::Range;

/// Split-into-N partition of a sequence.
///
/// `len` elements are cut into exactly `pieces` contiguous ranges whose lengths
/// differ by at most one; the first `len % pieces` ranges carry the extra
/// element. When `pieces > len` the trailing ranges are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPartition {
    bounds: Vec<Range<usize>>,
}

impl SplitPartition {
    pub fn new(len: usize, pieces: usize) -> Self {
        if pieces == 0 {
            return Self { bounds: Vec::new() };
        }

        let base = len / pieces;
        let extra = len % pieces;
        let mut start = 0;
        let bounds = (0..pieces)
            .map(|i| {
                let size = base + usize::from(i < extra);
                let range = start..start + size;
                start += size;
                range
            })
            .collect();

        Self { bounds }
    }

    pub fn piece_count(&self) -> usize {
        self.bounds.len()
    }

    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        self.bounds.get(index).cloned()
    }

    /// Slice of `data` covered by piece `index`.
    pub fn piece<'a>(&self, data: &'a [f64], index: usize) -> Option<&'a [f64]> {
        self.bounds.get(index).and_then(|r| data.get(r.clone()))
    }

    pub fn pieces<'a>(&'a self, data: &'a [f64]) -> impl Iterator<Item = &'a [f64]> + 'a {
        self.bounds.iter().map(move |r| &data[r.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let partition = SplitPartition::new(8, 2);
        assert_eq!(partition.piece_count(), 2);
        assert_eq!(partition.range(0), Some(0..4));
        assert_eq!(partition.range(1), Some(4..8));
    }

    #[test]
    fn test_uneven_split_front_loads_extra() {
        // 10 into 4 → 3, 3, 2, 2
        let partition = SplitPartition::new(10, 4);
        let sizes: Vec<usize> = (0..4)
            .map(|i| partition.range(i).map(|r| r.len()).unwrap_or(0))
            .collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(partition.range(3), Some(8..10));
    }

    #[test]
    fn test_more_pieces_than_elements() {
        let partition = SplitPartition::new(2, 4);
        let data = [1.0, 2.0];
        let pieces: Vec<&[f64]> = partition.pieces(&data).collect();
        assert_eq!(pieces, vec![&[1.0][..], &[2.0][..], &[][..], &[][..]]);
    }

    #[test]
    fn test_zero_pieces() {
        let partition = SplitPartition::new(5, 0);
        assert_eq!(partition.piece_count(), 0);
        assert!(partition.piece(&[1.0; 5], 0).is_none());
    }

    #[test]
    fn test_pieces_cover_input_in_order() {
        let data: Vec<f64> = (0..13).map(f64::from).collect();
        let partition = SplitPartition::new(data.len(), 5);
        let rejoined: Vec<f64> = partition.pieces(&data).flatten().copied().collect();
        assert_eq!(rejoined, data);
    }
}
