//! Closest-candidate search over a single fold.
//!
//! Exact search scores every stored point. Approximate search first keeps the
//! `projection_samples` sketches nearest to the query's sketch in Hamming
//! distance ([`HammingShortlist`]) and only scores those.

use std::collections::BinaryHeap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::sketch::bits::Sketch;
use crate::sketch::fold::FoldStore;

/// Squared distance to the closest stored point of a fold, and its position.
///
/// In JSON the distance of an empty fold is `null`, and `null` reads back as
/// `+inf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Squared Euclidean distance; `+inf` when the fold is empty.
    #[serde(with = "finite_or_null")]
    pub distance: f64,
    /// Position of the closest point in insertion order.
    pub closest: Option<usize>,
}

impl Distance {
    /// Result for a fold with no points.
    pub const EMPTY: Distance = Distance {
        distance: f64::INFINITY,
        closest: None,
    };

    pub fn new(distance: f64, closest: usize) -> Self {
        Self {
            distance,
            closest: Some(closest),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.closest.is_none()
    }
}

mod finite_or_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// A shortlisted sketch: Hamming distance to the query, with the fold
/// position as payload and tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    hamming: u32,
    position: usize,
}

/// Bounded best-k selection by Hamming distance.
///
/// The heap top is the worst kept candidate: largest Hamming distance, and
/// among equals the latest position. A newcomer is admitted to a full list
/// only on a strictly smaller Hamming distance, so earlier positions win ties
/// both on entry and on eviction.
#[derive(Debug)]
pub struct HammingShortlist {
    capacity: usize,
    heap: BinaryHeap<Candidate>,
}

impl HammingShortlist {
    /// Keep at most `capacity` of `candidates` offered sketches.
    ///
    /// Storage is bounded by the smaller of the two, so an oversized
    /// `capacity` costs nothing up front.
    pub fn new(capacity: usize, candidates: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.min(candidates)),
        }
    }

    /// Offer the sketch at `position`. Positions must be offered in ascending order.
    pub fn offer(&mut self, hamming: u32, position: usize) {
        if self.heap.len() < self.capacity {
            self.heap.push(Candidate { hamming, position });
        } else if let Some(&worst) = self.heap.peek()
            && hamming < worst.hamming
        {
            self.heap.pop();
            self.heap.push(Candidate { hamming, position });
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Kept positions in ascending position order.
    pub fn into_positions(self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.heap.into_iter().map(|c| c.position).collect();
        positions.sort_unstable();
        positions
    }
}

/// Score the given positions and keep the strict minimum.
fn closest_among<I>(
    fold: &FoldStore,
    query: &[f32],
    query_norm_sq: f64,
    positions: I,
) -> Distance
where
    I: IntoIterator<Item = usize>,
{
    let mut best = Distance::EMPTY;
    for position in positions {
        let d = fold.squared_distance(query, query_norm_sq, position);
        if d < best.distance {
            best = Distance::new(d, position);
        }
    }
    best
}

/// Brute-force scan of every point in the fold.
pub fn exact_search(fold: &FoldStore, query: &[f32], query_norm_sq: f64) -> Distance {
    closest_among(fold, query, query_norm_sq, 0..fold.len())
}

/// Hamming-pruned search. `sketches` must be aligned with `fold`.
pub fn approximate_search(
    fold: &FoldStore,
    sketches: &[Sketch],
    query: &[f32],
    query_norm_sq: f64,
    query_sketch: &Sketch,
    projection_samples: usize,
) -> Distance {
    debug_assert_eq!(fold.len(), sketches.len());

    let mut shortlist = HammingShortlist::new(projection_samples, sketches.len());
    for (position, sketch) in sketches.iter().enumerate() {
        shortlist.offer(query_sketch.hamming_distance(sketch), position);
    }

    log::trace!(
        "Shortlisted {} of {} candidates",
        shortlist.len(),
        sketches.len()
    );

    closest_among(fold, query, query_norm_sq, shortlist.into_positions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::vector::Vector;

    fn fold_of(points: &[[f32; 2]]) -> FoldStore {
        let mut fold = FoldStore::new();
        for p in points {
            fold.push(Vector::new(p.to_vec()));
        }
        fold
    }

    #[test]
    fn test_shortlist_keeps_smallest() {
        let mut shortlist = HammingShortlist::new(2, 4);
        for (position, hamming) in [5, 3, 4, 1].into_iter().enumerate() {
            shortlist.offer(hamming, position);
        }
        assert_eq!(shortlist.into_positions(), vec![1, 3]);
    }

    #[test]
    fn test_shortlist_ties_favor_earlier_positions() {
        let mut shortlist = HammingShortlist::new(2, 4);
        for (position, hamming) in [2, 2, 2, 2].into_iter().enumerate() {
            shortlist.offer(hamming, position);
        }
        assert_eq!(shortlist.into_positions(), vec![0, 1]);

        // a strict improvement evicts the latest of the worst entries
        let mut shortlist = HammingShortlist::new(2, 3);
        for (position, hamming) in [3, 3, 1].into_iter().enumerate() {
            shortlist.offer(hamming, position);
        }
        assert_eq!(shortlist.into_positions(), vec![0, 2]);
    }

    #[test]
    fn test_shortlist_capacity_beyond_candidates() {
        for capacity in [usize::MAX, 1usize << 40] {
            let mut shortlist = HammingShortlist::new(capacity, 3);
            for (position, hamming) in [4, 0, 2].into_iter().enumerate() {
                shortlist.offer(hamming, position);
            }
            assert_eq!(shortlist.into_positions(), vec![0, 1, 2]);
        }

        let fold = fold_of(&[[1.0, 0.0], [0.0, 1.0]]);
        let sketches = vec![
            Sketch::from_projections(2, [1.0, -1.0]),
            Sketch::from_projections(2, [-1.0, 1.0]),
        ];
        let query_sketch = Sketch::from_projections(2, [1.0, 1.0]);
        let q = [0.0, 1.0];
        let approx = approximate_search(&fold, &sketches, &q, 1.0, &query_sketch, usize::MAX);
        assert_eq!(approx, exact_search(&fold, &q, 1.0));
    }

    #[test]
    fn test_distance_json_round_trip() {
        for distance in [Distance::EMPTY, Distance::new(0.02, 3), Distance::new(0.0, 0)] {
            let json = serde_json::to_string(&distance).unwrap();
            let back: Distance = serde_json::from_str(&json).unwrap();
            assert_eq!(back, distance);
        }

        let empty: Distance = serde_json::from_str(r#"{"distance":null,"closest":null}"#).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.distance, f64::INFINITY);
    }

    #[test]
    fn test_exact_search_large_close_points() {
        let base = [3000.0f32, -2500.0, 4100.0, 1800.0];
        let mut fold = FoldStore::new();
        fold.push(Vector::new(base.iter().map(|x| x + 0.3).collect()));
        fold.push(Vector::new(base.iter().map(|x| x + 0.1).collect()));

        let q_norm = Vector::new(base.to_vec()).squared_norm();
        let result = exact_search(&fold, &base, q_norm);
        assert_eq!(result.closest, Some(1));
        assert!((result.distance - 0.04).abs() < 1e-3);
    }

    #[test]
    fn test_shortlist_duplicate_hamming_not_dropped() {
        let mut shortlist = HammingShortlist::new(3, 2);
        shortlist.offer(1, 0);
        shortlist.offer(1, 1);
        assert_eq!(shortlist.len(), 2);
    }

    #[test]
    fn test_exact_search_picks_first_minimum() {
        let fold = fold_of(&[[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]]);
        let q = [1.0, 0.0];
        let result = exact_search(&fold, &q, 1.0);
        assert_eq!(result.closest, Some(0));
        assert!(result.distance.abs() < 1e-6);
    }

    #[test]
    fn test_empty_fold_sentinel() {
        let fold = FoldStore::new();
        let q = [1.0, 0.0];
        assert_eq!(exact_search(&fold, &q, 1.0), Distance::EMPTY);

        let sketch = Sketch::from_projections(4, [1.0; 4]);
        let result = approximate_search(&fold, &[], &q, 1.0, &sketch, 2);
        assert!(result.is_empty());
        assert_eq!(result.distance, f64::INFINITY);
    }

    #[test]
    fn test_approximate_scores_only_shortlist() {
        let fold = fold_of(&[[1.0, 0.0], [0.0, 1.0]]);
        let q = [1.0, 0.0];
        let query_sketch = Sketch::from_projections(2, [1.0, 1.0]);
        // position 1 is the Hamming-nearest, position 0 the true nearest
        let sketches = vec![
            Sketch::from_projections(2, [-1.0, -1.0]),
            Sketch::from_projections(2, [1.0, 1.0]),
        ];

        let approx = approximate_search(&fold, &sketches, &q, 1.0, &query_sketch, 1);
        assert_eq!(approx.closest, Some(1));
        assert!((approx.distance - 2.0).abs() < 1e-6);

        let saturated = approximate_search(&fold, &sketches, &q, 1.0, &query_sketch, 2);
        assert_eq!(saturated, exact_search(&fold, &q, 1.0));
    }
}
