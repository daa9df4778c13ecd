//! Configuration types for the sketch index.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KSketchError, Result};

/// Construction parameters for a [`KSketchIndex`](super::index::KSketchIndex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchIndexConfig {
    /// Number of independent candidate-center sets.
    pub num_folds: usize,
    /// Vector dimension, fixed for the lifetime of the index.
    pub dimension: usize,
    /// Sketch width and number of random projection directions.
    pub projection_bits: usize,
    /// Shortlist size for approximate search.
    pub projection_samples: usize,
    /// Seed of the Gaussian stream that generates the projection.
    pub seed: u64,
    /// Use the rayon pool for rebuilds and multi-fold queries.
    pub parallel: bool,
}

impl Default for SketchIndexConfig {
    fn default() -> Self {
        Self {
            num_folds: 1,
            dimension: 128,
            projection_bits: 64,
            projection_samples: 16,
            seed: 42,
            parallel: true,
        }
    }
}

impl SketchIndexConfig {
    /// Create a new configuration with the given fold count and dimension.
    pub fn new(num_folds: usize, dimension: usize) -> Self {
        Self {
            num_folds,
            dimension,
            ..Default::default()
        }
    }

    /// Set the number of projection bits.
    pub fn with_projection_bits(mut self, projection_bits: usize) -> Self {
        self.projection_bits = projection_bits;
        self
    }

    /// Set the approximate-search shortlist size.
    pub fn with_projection_samples(mut self, projection_samples: usize) -> Self {
        self.projection_samples = projection_samples;
        self
    }

    /// Set the projection seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable rayon parallelism.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_folds == 0 {
            return Err(KSketchError::configuration("num_folds must be > 0"));
        }
        if self.dimension == 0 {
            return Err(KSketchError::configuration("dimension must be > 0"));
        }
        if self.projection_bits == 0 {
            return Err(KSketchError::configuration("projection_bits must be > 0"));
        }
        if self.projection_samples == 0 {
            return Err(KSketchError::configuration("projection_samples must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
