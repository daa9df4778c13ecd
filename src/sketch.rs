//! Candidate-center index for k-means|| seeding.
//!
//! Each fold holds the candidate centers of one sampling trial. Queries ask for
//! the closest stored center of a fold, either exactly or through
//! random-hyperplane sketches that prune the candidates by Hamming distance.
//!
//! # Module Structure
//!
//! - `config`: construction parameters
//! - `vector`: dense point type
//! - `projection`: seeded Gaussian projection producing sketches
//! - `bits`: fixed-width sketch bit vectors
//! - `fold`: per-fold point storage
//! - `search`: exact and approximate closest-point search
//! - `index`: the `KSketchIndex` façade
//! - `weights`: weighted-vector export

pub mod bits;
pub mod config;
pub mod fold;
pub mod index;
pub mod projection;
pub mod search;
pub mod vector;
pub mod weights;

pub use self::config::SketchIndexConfig;
pub use self::index::{IndexState, KSketchIndex, ProjectorState};
pub use self::search::Distance;
pub use self::vector::Vector;
pub use self::weights::{ClosestCenterCounts, WeightSource, WeightedVector};
