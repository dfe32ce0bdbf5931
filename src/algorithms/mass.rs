use crate::algorithms::distance_profile::{DistanceProfileCalculator, QueryWindow};
use crate::core::error::{Error, Result};
use crate::core::matrix_profile::RollingStats;

/// A single match of a query inside a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occurrence {
    /// Offset of the matching subsequence in the series.
    pub index: usize,
    /// Z-normalized Euclidean distance between query and this subsequence.
    pub distance: f64,
}

/// Compute the z-normalized distance profile of a query against a time series.
///
/// MASS (Mueen's Algorithm for Similarity Search):
/// 1. Rolling statistics (mean, std) of the series and of the query
/// 2. Sliding dot product of the z-normalized query with the series
/// 3. Dot products converted to z-normalized Euclidean distances
///
/// # Returns
/// A distance profile of length `ts.len() - query.len() + 1`.
pub fn mass(query: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    let m = query.len();
    Error::check_window(m, ts.len())?;

    let stats = RollingStats::compute(ts, m)?;
    let query_stats = RollingStats::compute(query, m)?;
    let window = QueryWindow::from_series(query, &query_stats, 0, m);

    DistanceProfileCalculator::new(ts, &stats, m)?.distance_profile(&window)
}

/// The `n` closest subsequences of `ts` to `query`, nearest first.
///
/// Ties keep the smaller offset first. No exclusion is applied between the
/// returned offsets.
pub fn find_best_n_occurrences(query: &[f64], ts: &[f64], n: usize) -> Result<Vec<Occurrence>> {
    let profile = mass(query, ts)?;
    if n == 0 || n > profile.len() {
        return Err(Error::InvalidArgument(format!(
            "Number of occurrences must be in [1, {}], got {n}",
            profile.len()
        )));
    }

    let mut occurrences: Vec<Occurrence> = profile
        .into_iter()
        .enumerate()
        .map(|(index, distance)| Occurrence { index, distance })
        .collect();
    occurrences.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    occurrences.truncate(n);
    Ok(occurrences)
}
