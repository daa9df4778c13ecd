//! Random hyperplane projection.
//!
//! A [`RandomProjector`] holds `dimension * projection_bits` standard-Gaussian
//! weights drawn from a single seeded stream. Draw `i` is stored at flat
//! position `i`, and the direction for bit `j` is the contiguous slice
//! `[j * dimension, (j + 1) * dimension)`. Changing the draw order changes every
//! sketch, so it must stay fixed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::sketch::bits::Sketch;
use crate::util::simd::dot_product_simd;

/// Seeded Gaussian projection matrix shared by all folds.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomProjector {
    dimension: usize,
    projection_bits: usize,
    weights: Vec<f32>,
}

impl RandomProjector {
    /// Generate the projection deterministically from `seed`.
    pub fn generate(dimension: usize, projection_bits: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = (0..dimension * projection_bits)
            .map(|_| {
                let sample: f64 = rng.sample(StandardNormal);
                sample as f32
            })
            .collect();

        log::debug!("Generated {dimension}x{projection_bits} Gaussian projection (seed {seed})");

        Self {
            dimension,
            projection_bits,
            weights,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn projection_bits(&self) -> usize {
        self.projection_bits
    }

    /// Flat weight matrix in draw order.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Random direction backing bit `bit`.
    pub fn direction(&self, bit: usize) -> &[f32] {
        let start = bit * self.dimension;
        &self.weights[start..start + self.dimension]
    }

    /// Sign sketch of `vector`, which must have `dimension` components.
    pub fn sketch(&self, vector: &[f32]) -> Sketch {
        Sketch::from_projections(
            self.projection_bits,
            (0..self.projection_bits).map(|bit| dot_product_simd(vector, self.direction(bit))),
        )
    }
}
