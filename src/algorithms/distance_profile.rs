use std::ops::Range;

use crate::algorithms::common::SlidingDotProduct;
use crate::algorithms::mask::ExclusionMask;
use crate::core::error::Result;
use crate::core::matrix_profile::{Neighbor, RollingStats, NO_NEIGHBOR};

/// A z-normalized query window staged for convolution.
///
/// A window flagged constant by [`RollingStats`] normalizes to the zero vector.
#[derive(Debug, Clone)]
pub struct QueryWindow {
    pub normalized: Vec<f64>,
    /// Sum of the normalized values.
    pub sum: f64,
    /// Sum of squares of the normalized values.
    pub sum_sq: f64,
}

impl QueryWindow {
    pub fn new(window: &[f64], mean: f64, sigma_inv: f64) -> Self {
        let normalized: Vec<f64> = window.iter().map(|&x| (x - mean) * sigma_inv).collect();
        let sum = normalized.iter().sum();
        let sum_sq = normalized.iter().map(|x| x * x).sum();
        Self {
            normalized,
            sum,
            sum_sq,
        }
    }

    /// Window `i` of `ts`, using precomputed statistics of `ts`.
    pub fn from_series(ts: &[f64], stats: &RollingStats, i: usize, m: usize) -> Self {
        Self::new(&ts[i..i + m], stats.mean[i], stats.sigma_inv[i])
    }
}

/// Z-normalized Euclidean distance from the dot product of a normalized query
/// with reference window `j`:
///
/// `d = sqrt(|a[j] - 2 * (qt - Σq * mean[j]) / std[j] + Σq²|)`
#[inline]
pub fn distance_from_dot(qt: f64, query: &QueryWindow, stats: &RollingStats, j: usize) -> f64 {
    let cross = (qt - query.sum * stats.mean[j]) * stats.sigma_inv[j];
    (stats.aux[j] - 2.0 * cross + query.sum_sq).abs().sqrt()
}

/// Argmin over a distance profile, skipping the `excluded` offsets.
///
/// Strict `<` keeps the first minimal offset. Returns [`Neighbor::NONE`] when
/// every offset is excluded.
pub fn argmin_unmasked(profile: &[f64], excluded: Range<usize>) -> Neighbor {
    let mut best = Neighbor::NONE;
    for (j, &d) in profile.iter().enumerate() {
        if excluded.contains(&j) {
            continue;
        }
        if d < best.distance {
            best = Neighbor {
                distance: d,
                index: j,
            };
        }
    }
    best
}

/// Distance profiles of query windows against one reference slice.
pub struct DistanceProfileCalculator<'a> {
    stats: &'a RollingStats,
    kernel: SlidingDotProduct<'a>,
}

impl<'a> DistanceProfileCalculator<'a> {
    /// `stats` must be the rolling statistics of `reference` for length `m`.
    pub fn new(reference: &'a [f64], stats: &'a RollingStats, m: usize) -> Result<Self> {
        let kernel = SlidingDotProduct::new(reference, m)?;
        debug_assert_eq!(stats.len(), kernel.n_subs());
        Ok(Self { stats, kernel })
    }

    /// Full distance profile of `query` against every reference offset.
    pub fn distance_profile(&self, query: &QueryWindow) -> Result<Vec<f64>> {
        let qt = self.kernel.compute(&query.normalized)?;
        Ok(qt
            .iter()
            .enumerate()
            .map(|(j, &dot)| distance_from_dot(dot, query, self.stats, j))
            .collect())
    }

    /// Nearest admissible reference offset (local to this slice) for `query`.
    pub fn nearest_neighbor(&self, query: &QueryWindow, excluded: Range<usize>) -> Result<Neighbor> {
        let profile = self.distance_profile(query)?;
        Ok(argmin_unmasked(&profile, excluded))
    }

    /// Nearest neighbors of query windows `rows` of `query_ts`.
    ///
    /// Row `r` of `mask` corresponds to query offset `rows.start + r`. Returned
    /// indices are shifted by `col_offset` into global reference coordinates;
    /// rows without an admissible neighbor keep [`NO_NEIGHBOR`].
    pub fn nearest_neighbors(
        &self,
        query_ts: &[f64],
        query_stats: &RollingStats,
        m: usize,
        rows: Range<usize>,
        mask: Option<&ExclusionMask>,
        col_offset: usize,
    ) -> Result<Vec<Neighbor>> {
        let row_start = rows.start;
        let eval = |i: usize| -> Result<Neighbor> {
            let query = QueryWindow::from_series(query_ts, query_stats, i, m);
            let excluded = mask.map_or(0..0, |mk| mk.excluded_columns(i - row_start));
            let mut nn = self.nearest_neighbor(&query, excluded)?;
            if nn.index != NO_NEIGHBOR {
                nn.index += col_offset;
            }
            Ok(nn)
        };

        #[cfg(feature = "parallel")]
        let neighbors: Result<Vec<Neighbor>> = {
            use rayon::prelude::*;
            rows.into_par_iter().map(eval).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let neighbors: Result<Vec<Neighbor>> = rows.map(eval).collect();

        neighbors
    }
}
