//! Core vector data structure.

use serde::{Deserialize, Serialize};

use crate::error::{KSketchError, Result};
use crate::util::simd::{dot_product_wide, squared_norm_wide};

/// A dense, immutable point stored in a fold or used as a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    /// The vector components.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector from its components.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Squared L2 norm, accumulated in `f64`.
    pub fn squared_norm(&self) -> f64 {
        squared_norm_wide(&self.data)
    }

    /// Dot product with a slice of the same dimension, accumulated in `f64`.
    pub fn dot(&self, other: &[f32]) -> f64 {
        dot_product_wide(&self.data, other)
    }

    /// Validate that this vector has the expected dimension.
    pub fn validate_dimension(&self, expected_dim: usize) -> Result<()> {
        validate_dimension(&self.data, expected_dim)
    }

}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}

pub(crate) fn validate_dimension(data: &[f32], expected_dim: usize) -> Result<()> {
    if data.len() != expected_dim {
        return Err(KSketchError::dimension_mismatch(expected_dim, data.len()));
    }
    Ok(())
}
