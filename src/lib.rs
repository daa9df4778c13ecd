//! # ksketch
//!
//! An in-memory index of candidate centers for k-means|| ("k-means parallel")
//! seeding.
//!
//! ## Features
//!
//! - Independent folds of candidate centers that only grow
//! - Exact closest-center search with cached squared norms
//! - Approximate search pruned by random-hyperplane sketches
//! - Deterministic projections from a 64-bit seed
//! - Weighted-vector export for center reweighting

pub mod cli;
pub mod error;
pub mod sketch;
pub mod util;

pub mod prelude {
    pub use crate::error::{KSketchError, Result};
    pub use crate::sketch::{
        ClosestCenterCounts, Distance, KSketchIndex, SketchIndexConfig, Vector, WeightSource,
        WeightedVector,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
