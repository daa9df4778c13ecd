//! Weighted-vector export for the center reweighting step.

use serde::{Deserialize, Serialize};

use crate::error::{KSketchError, Result};
use crate::sketch::search::Distance;
use crate::sketch::vector::Vector;

/// A stored center paired with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedVector {
    pub vector: Vector,
    pub weight: f64,
}

impl WeightedVector {
    pub fn new(vector: Vector, weight: f64) -> Self {
        Self { vector, weight }
    }
}

/// Externally computed weight table indexed by fold and position.
///
/// Returning `None` means the table has no entry for that point; the export
/// reports it instead of substituting a default.
pub trait WeightSource {
    fn weight(&self, fold: usize, position: usize) -> Option<f64>;
}

impl WeightSource for [Vec<f64>] {
    fn weight(&self, fold: usize, position: usize) -> Option<f64> {
        self.get(fold)?.get(position).copied()
    }
}

impl WeightSource for Vec<Vec<f64>> {
    fn weight(&self, fold: usize, position: usize) -> Option<f64> {
        self.as_slice().weight(fold, position)
    }
}

/// Per-fold tally of how often each stored center was the closest one to a
/// sampled point.
///
/// This is the usual producer of k-means|| center weights: record the
/// [`Distance`] results of every point against every fold, then export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClosestCenterCounts {
    counts: Vec<Vec<f64>>,
}

impl ClosestCenterCounts {
    /// Zeroed table shaped like `point_counts`.
    pub fn new(point_counts: &[usize]) -> Self {
        Self {
            counts: point_counts.iter().map(|&n| vec![0.0; n]).collect(),
        }
    }

    pub fn num_folds(&self) -> usize {
        self.counts.len()
    }

    /// Count one point, given its per-fold closest-center results.
    pub fn record(&mut self, distances: &[Distance]) -> Result<()> {
        self.record_weighted(distances, 1.0)
    }

    /// Add `weight` to the closest center of every fold. Empty-fold
    /// results are skipped. On error the table is left unchanged.
    pub fn record_weighted(&mut self, distances: &[Distance], weight: f64) -> Result<()> {
        if distances.len() != self.counts.len() {
            return Err(KSketchError::fold_index(distances.len(), self.counts.len()));
        }

        for (fold, distance) in distances.iter().enumerate() {
            if let Some(position) = distance.closest
                && position >= self.counts[fold].len()
            {
                return Err(KSketchError::WeightCountMismatch {
                    fold,
                    expected: position + 1,
                    actual: self.counts[fold].len(),
                });
            }
        }

        for (row, distance) in self.counts.iter_mut().zip(distances) {
            if let Some(position) = distance.closest {
                row[position] += weight;
            }
        }
        Ok(())
    }

    /// Weights of one fold in position order.
    pub fn fold(&self, fold: usize) -> Option<&[f64]> {
        self.counts.get(fold).map(Vec::as_slice)
    }
}

impl WeightSource for ClosestCenterCounts {
    fn weight(&self, fold: usize, position: usize) -> Option<f64> {
        self.counts.weight(fold, position)
    }
}

/// Pair `vectors` with the leading entries of `weights`.
pub(crate) fn pair_with_weights(
    fold: usize,
    vectors: &[Vector],
    weights: &[f64],
) -> Result<Vec<WeightedVector>> {
    if weights.len() < vectors.len() {
        return Err(KSketchError::WeightCountMismatch {
            fold,
            expected: vectors.len(),
            actual: weights.len(),
        });
    }

    Ok(vectors
        .iter()
        .zip(weights)
        .map(|(vector, &weight)| WeightedVector::new(vector.clone(), weight))
        .collect())
}

/// Pair `vectors` with `source.weight(fold, j)` for every position `j`.
pub(crate) fn pair_with_source<S>(
    fold: usize,
    vectors: &[Vector],
    source: &S,
) -> Result<Vec<WeightedVector>>
where
    S: WeightSource + ?Sized,
{
    vectors
        .iter()
        .enumerate()
        .map(|(position, vector)| {
            source
                .weight(fold, position)
                .map(|weight| WeightedVector::new(vector.clone(), weight))
                .ok_or(KSketchError::WeightCountMismatch {
                    fold,
                    expected: vectors.len(),
                    actual: position,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors(n: usize) -> Vec<Vector> {
        (0..n).map(|i| Vector::new(vec![i as f32, 0.0])).collect()
    }

    #[test]
    fn test_pair_with_weights_ignores_excess() {
        let weighted = pair_with_weights(0, &vectors(2), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(weighted.len(), 2);
        assert_eq!(weighted[1].weight, 2.0);
        assert_eq!(weighted[1].vector.data, vec![1.0, 0.0]);
    }

    #[test]
    fn test_pair_with_weights_short() {
        match pair_with_weights(3, &vectors(3), &[1.0]) {
            Err(KSketchError::WeightCountMismatch {
                fold,
                expected,
                actual,
            }) => {
                assert_eq!((fold, expected, actual), (3, 3, 1));
            }
            other => panic!("Expected weight count mismatch, got {other:?}"),
        }
    }

    struct Arithmetic;

    impl WeightSource for Arithmetic {
        fn weight(&self, fold: usize, position: usize) -> Option<f64> {
            Some((fold * 10 + position) as f64)
        }
    }

    #[test]
    fn test_pair_with_custom_source() {
        let weighted = pair_with_source(2, &vectors(3), &Arithmetic).unwrap();
        let weights: Vec<f64> = weighted.iter().map(|w| w.weight).collect();
        assert_eq!(weights, vec![20.0, 21.0, 22.0]);
    }

    #[test]
    fn test_pair_with_source_missing_entry() {
        let table = vec![vec![1.0]];
        assert!(matches!(
            pair_with_source(0, &vectors(2), &table),
            Err(KSketchError::WeightCountMismatch { actual: 1, .. })
        ));
    }

    #[test]
    fn test_closest_center_counts() {
        let mut counts = ClosestCenterCounts::new(&[2, 0, 3]);
        counts
            .record(&[Distance::new(0.5, 1), Distance::EMPTY, Distance::new(0.1, 2)])
            .unwrap();
        counts
            .record_weighted(&[Distance::new(0.2, 1), Distance::EMPTY, Distance::new(0.3, 0)], 2.5)
            .unwrap();

        assert_eq!(counts.num_folds(), 3);
        assert_eq!(counts.fold(0), Some(&[0.0, 3.5][..]));
        assert_eq!(counts.fold(1), Some(&[][..]));
        assert_eq!(counts.fold(2), Some(&[2.5, 0.0, 1.0][..]));
        assert_eq!(counts.weight(2, 0), Some(2.5));
        assert_eq!(counts.weight(1, 0), None);
    }

    #[test]
    fn test_closest_center_counts_rejects_bad_shape() {
        let mut counts = ClosestCenterCounts::new(&[1]);
        assert!(matches!(
            counts.record(&[]),
            Err(KSketchError::FoldIndex { .. })
        ));
        assert!(matches!(
            counts.record(&[Distance::new(0.0, 4)]),
            Err(KSketchError::WeightCountMismatch { fold: 0, .. })
        ));
    }

    #[test]
    fn test_closest_center_counts_unchanged_on_error() {
        let mut counts = ClosestCenterCounts::new(&[1, 1]);
        counts.record(&[Distance::new(0.0, 0), Distance::EMPTY]).unwrap();
        let before = counts.clone();

        assert!(matches!(
            counts.record(&[Distance::new(0.0, 0), Distance::new(0.0, 5)]),
            Err(KSketchError::WeightCountMismatch {
                fold: 1,
                expected: 6,
                actual: 1
            })
        ));
        assert_eq!(counts, before);
        assert_eq!(counts.fold(0), Some(&[1.0][..]));
    }
}
