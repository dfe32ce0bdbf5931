pub mod algorithms;
pub mod core;

pub use crate::algorithms::distance_profile::{DistanceProfileCalculator, QueryWindow};
pub use crate::algorithms::mask::{band_size, tile_is_far_from_diagonal, ExclusionMask, Tile};
pub use crate::algorithms::mass::{find_best_n_occurrences, mass, Occurrence};
pub use crate::algorithms::motifs::{
    find_best_n_discords, find_best_n_motifs, select_best_n, Direction, MotifRecord, MotifSet,
};
pub use crate::algorithms::stomp::BatchStrategy;
pub use crate::core::config::{Complexity, MatrixProfileConfig, MemoryBudget};
pub use crate::core::error::{Error, Result};
pub use crate::core::matrix_profile::{
    MatrixProfile, Neighbor, ProfileSet, RollingStats, NO_NEIGHBOR,
};
pub use crate::core::series::TimeSeriesSet;

/// High-level facade for matrix profile computation.
///
/// Holds the configuration (subsequence length and memory budget) shared by
/// every call; no state survives between calls.
///
/// # Examples
///
/// ```
/// use tsmp::{Engine, MatrixProfileConfig, TimeSeriesSet};
///
/// let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0];
/// let engine = Engine::new(MatrixProfileConfig::new(4));
/// let set = engine.stomp_self_join(&TimeSeriesSet::single(&ts).unwrap()).unwrap();
/// assert_eq!(set.profiles[0].profile.len(), ts.len() - 4 + 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: MatrixProfileConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatrixProfileConfig {
        &self.config
    }

    /// Self-join matrix profile of every series in `tss`, with trivial-match
    /// exclusion.
    pub fn stomp_self_join(&self, tss: &TimeSeriesSet) -> Result<ProfileSet> {
        crate::algorithms::stomp::stomp_self_join(tss, &self.config)
    }

    /// AB-join of every query series against every reference series.
    pub fn stomp(&self, query: &TimeSeriesSet, reference: &TimeSeriesSet) -> Result<ProfileSet> {
        crate::algorithms::stomp::stomp(query, reference, &self.config)
    }

    /// Best `n` non-overlapping motifs of every profile in `set`.
    pub fn find_best_n_motifs(&self, set: &ProfileSet, n: usize) -> Result<Vec<MotifSet>> {
        find_best_n_motifs(set, n)
    }

    /// Best `n` non-overlapping discords of every profile in `set`.
    pub fn find_best_n_discords(&self, set: &ProfileSet, n: usize) -> Result<Vec<MotifSet>> {
        find_best_n_discords(set, n)
    }
}
