//! Per-fold point storage.

use crate::sketch::vector::Vector;

/// Ordered points of one fold plus their cached squared norms.
///
/// Position in insertion order is the candidate index reported by searches.
#[derive(Debug, Clone, Default)]
pub struct FoldStore {
    points: Vec<Vector>,
    length_squared: Vec<f64>,
}

impl FoldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point. Dimension checks happen in the index.
    pub fn push(&mut self, vector: Vector) {
        self.length_squared.push(vector.squared_norm());
        self.points.push(vector);
    }

    /// Number of points in this fold.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn length_squared(&self) -> &[f64] {
        &self.length_squared
    }

    /// Squared Euclidean distance from a query to the point at `position`,
    /// via `|q|^2 + |p|^2 - 2 q.p`.
    pub fn squared_distance(&self, query: &[f32], query_norm_sq: f64, position: usize) -> f64 {
        query_norm_sq + self.length_squared[position] - 2.0 * self.points[position].dot(query)
    }
}
