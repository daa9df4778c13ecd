//! The k-means|| candidate-center index.
//!
//! [`KSketchIndex`] keeps one [`FoldStore`] per fold, a shared
//! [`RandomProjector`], and one sketch list per fold aligned with the stored
//! points. Any `add` marks the index [`IndexState::Stale`]; the next
//! approximate query rebuilds every fold's sketches before searching.
//!
//! ```
//! use ksketch::sketch::{KSketchIndex, SketchIndexConfig, Vector};
//!
//! let config = SketchIndexConfig::new(1, 2)
//!     .with_projection_bits(4)
//!     .with_projection_samples(2);
//! let mut index = KSketchIndex::new(config).unwrap();
//! index.add(Vector::new(vec![1.0, 0.0]), 0).unwrap();
//! index.add(Vector::new(vec![0.0, 1.0]), 0).unwrap();
//!
//! let exact = index.get_distance(&[0.9, 0.1], 0, false).unwrap();
//! assert_eq!(exact.closest, Some(0));
//! ```

use rayon::prelude::*;

use crate::error::{KSketchError, Result};
use crate::sketch::bits::Sketch;
use crate::sketch::config::SketchIndexConfig;
use crate::sketch::fold::FoldStore;
use crate::sketch::projection::RandomProjector;
use crate::sketch::search::{Distance, approximate_search, exact_search};
use crate::sketch::vector::{Vector, validate_dimension};
use crate::sketch::weights::{WeightSource, WeightedVector, pair_with_source, pair_with_weights};
use crate::util::simd::squared_norm_wide;

/// Minimum total point count before a rebuild fans out over rayon.
const PARALLEL_REBUILD_THRESHOLD: usize = 1000;

/// Minimum fold count before `get_distances` fans out over rayon.
const PARALLEL_FOLD_THRESHOLD: usize = 8;

/// Whether the sketch lists reflect the stored points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Points were added since the last rebuild.
    Stale,
    /// Sketches are aligned with the stored points.
    Fresh,
}

/// Lifecycle of the shared projection matrix.
#[derive(Debug, Clone)]
pub enum ProjectorState {
    /// Not generated yet; the first rebuild generates it.
    Unbuilt,
    /// Generated and immutable for the rest of the index lifetime.
    Built(RandomProjector),
}

/// In-memory index of candidate centers, one fold per sampling trial.
#[derive(Debug, Clone)]
pub struct KSketchIndex {
    config: SketchIndexConfig,
    folds: Vec<FoldStore>,
    sketches: Vec<Vec<Sketch>>,
    projector: ProjectorState,
    state: IndexState,
    rebuilds: u64,
}

impl KSketchIndex {
    /// Create an index with `config.num_folds` empty folds.
    pub fn new(config: SketchIndexConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            folds: vec![FoldStore::new(); config.num_folds],
            sketches: vec![Vec::new(); config.num_folds],
            config,
            projector: ProjectorState::Unbuilt,
            // the first approximate query must build the projector
            state: IndexState::Stale,
            rebuilds: 0,
        })
    }

    /// Create an index with one fold per center set, adding every center.
    ///
    /// The dimension is taken from the first center of the first set; all
    /// centers must share it.
    pub fn from_centers(
        center_sets: &[Vec<Vector>],
        projection_bits: usize,
        projection_samples: usize,
        seed: u64,
    ) -> Result<Self> {
        let first_set = center_sets
            .first()
            .ok_or_else(|| KSketchError::configuration("at least one center set is required"))?;
        let first = first_set
            .first()
            .ok_or_else(|| KSketchError::configuration("the first center set is empty"))?;
        let dimension = first.dimension();

        for (fold, centers) in center_sets.iter().enumerate() {
            for (position, center) in centers.iter().enumerate() {
                if center.dimension() != dimension {
                    return Err(KSketchError::configuration(format!(
                        "center {position} of set {fold} has dimension {}, expected {dimension}",
                        center.dimension()
                    )));
                }
            }
        }

        let config = SketchIndexConfig::new(center_sets.len(), dimension)
            .with_projection_bits(projection_bits)
            .with_projection_samples(projection_samples)
            .with_seed(seed);
        let mut index = Self::new(config)?;

        for (fold, centers) in center_sets.iter().enumerate() {
            for center in centers {
                index.add(center.clone(), fold)?;
            }
        }

        Ok(index)
    }

    pub fn config(&self) -> &SketchIndexConfig {
        &self.config
    }

    /// Dimension of every stored point.
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Number of folds.
    pub fn size(&self) -> usize {
        self.folds.len()
    }

    /// Number of points in each fold.
    pub fn point_counts(&self) -> Vec<usize> {
        self.folds.iter().map(FoldStore::len).collect()
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn projector_state(&self) -> &ProjectorState {
        &self.projector
    }

    /// The projection matrix, once a rebuild has generated it.
    pub fn projector(&self) -> Option<&RandomProjector> {
        match &self.projector {
            ProjectorState::Built(projector) => Some(projector),
            ProjectorState::Unbuilt => None,
        }
    }

    /// How many times the sketch lists have been rebuilt.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Stored points of a fold in insertion order.
    pub fn fold_vectors(&self, fold: usize) -> Result<&[Vector]> {
        Ok(self.fold(fold)?.points())
    }

    /// Sketches of a fold. `None` while the index is stale.
    pub fn fold_sketches(&self, fold: usize) -> Result<Option<&[Sketch]>> {
        self.check_fold(fold)?;
        Ok(match self.state {
            IndexState::Fresh => Some(&self.sketches[fold]),
            IndexState::Stale => None,
        })
    }

    /// Append a point to a fold and mark the index stale.
    pub fn add(&mut self, vector: Vector, fold: usize) -> Result<()> {
        self.check_fold(fold)?;
        vector.validate_dimension(self.config.dimension)?;

        self.folds[fold].push(vector);
        self.state = IndexState::Stale;
        Ok(())
    }

    /// Generate the projection if needed and recompute every fold's sketches.
    pub fn rebuild_indices(&mut self) {
        let projector = match std::mem::replace(&mut self.projector, ProjectorState::Unbuilt) {
            ProjectorState::Built(projector) => projector,
            ProjectorState::Unbuilt => RandomProjector::generate(
                self.config.dimension,
                self.config.projection_bits,
                self.config.seed,
            ),
        };

        let total_points: usize = self.folds.iter().map(FoldStore::len).sum();
        let sketch_fold = |fold: &FoldStore| -> Vec<Sketch> {
            fold.points()
                .iter()
                .map(|point| projector.sketch(&point.data))
                .collect()
        };

        self.sketches = if self.config.parallel && total_points > PARALLEL_REBUILD_THRESHOLD {
            self.folds.par_iter().map(sketch_fold).collect()
        } else {
            self.folds.iter().map(sketch_fold).collect()
        };

        self.projector = ProjectorState::Built(projector);
        self.state = IndexState::Fresh;
        self.rebuilds += 1;
        log::debug!(
            "Rebuilt sketches for {} folds ({total_points} points)",
            self.folds.len()
        );
    }

    /// Squared distance to the closest point of `fold`, and its position.
    ///
    /// With `approx`, a stale index is rebuilt first and only the
    /// `projection_samples` Hamming-nearest candidates are scored. An empty
    /// fold yields [`Distance::EMPTY`].
    pub fn get_distance(&mut self, vector: &[f32], fold: usize, approx: bool) -> Result<Distance> {
        self.check_fold(fold)?;
        validate_dimension(vector, self.config.dimension)?;
        if approx {
            self.ensure_fresh();
        }
        Ok(self.search(vector, fold, approx))
    }

    /// One result per fold, in fold order.
    pub fn get_distances(&mut self, vector: &[f32], approx: bool) -> Result<Vec<Distance>> {
        validate_dimension(vector, self.config.dimension)?;
        if approx {
            self.ensure_fresh();
        }

        let this = &*self;
        let num_folds = this.folds.len();
        let fan_out = this.config.parallel && num_folds >= PARALLEL_FOLD_THRESHOLD;
        let distances: Vec<Distance> = if fan_out {
            (0..num_folds)
                .into_par_iter()
                .map(|fold| this.search(vector, fold, approx))
                .collect()
        } else {
            (0..num_folds)
                .map(|fold| this.search(vector, fold, approx))
                .collect()
        };
        Ok(distances)
    }

    /// Pair the points of `fold` with `weights[i]`. Extra weights are ignored.
    pub fn get_weighted_vectors_for_fold(
        &self,
        fold: usize,
        weights: &[f64],
    ) -> Result<Vec<WeightedVector>> {
        pair_with_weights(fold, self.fold(fold)?.points(), weights)
    }

    /// Pair every stored point with `source.weight(fold, position)`.
    pub fn get_weighted_vectors<S>(&self, source: &S) -> Result<Vec<Vec<WeightedVector>>>
    where
        S: WeightSource + ?Sized,
    {
        self.folds
            .iter()
            .enumerate()
            .map(|(fold, store)| pair_with_source(fold, store.points(), source))
            .collect()
    }

    fn ensure_fresh(&mut self) {
        if self.state == IndexState::Stale {
            self.rebuild_indices();
        }
    }

    /// Search a validated fold. Approximate search requires a fresh index.
    fn search(&self, vector: &[f32], fold: usize, approx: bool) -> Distance {
        let store = &self.folds[fold];
        let query_norm_sq = squared_norm_wide(vector);

        match (&self.projector, approx) {
            (ProjectorState::Built(projector), true) => {
                debug_assert_eq!(self.state, IndexState::Fresh);
                approximate_search(
                    store,
                    &self.sketches[fold],
                    vector,
                    query_norm_sq,
                    &projector.sketch(vector),
                    self.config.projection_samples,
                )
            }
            _ => exact_search(store, vector, query_norm_sq),
        }
    }

    fn check_fold(&self, fold: usize) -> Result<()> {
        if fold >= self.folds.len() {
            return Err(KSketchError::fold_index(fold, self.folds.len()));
        }
        Ok(())
    }

    fn fold(&self, fold: usize) -> Result<&FoldStore> {
        self.folds
            .get(fold)
            .ok_or_else(|| KSketchError::fold_index(fold, self.folds.len()))
    }
}
