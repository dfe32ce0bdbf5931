use log::{debug, trace, warn};

use crate::algorithms::distance_profile::DistanceProfileCalculator;
use crate::algorithms::mask::{ExclusionMask, Tile};
use crate::core::config::MatrixProfileConfig;
use crate::core::error::{Error, Result};
use crate::core::matrix_profile::{MatrixProfile, NeighborAccumulator, ProfileSet, RollingStats};
use crate::core::series::TimeSeriesSet;

/// How the distance matrix is split into tiles.
///
/// Chosen from the number of query and reference offsets against the batch
/// threshold `B`:
/// - `SinglePass`: both fit, one tile.
/// - `QueryBatched`: only the query side exceeds `B`; query chunks of `B`, the
///   reference statistics and spectrum are computed once.
/// - `TwoLevel`: the reference side exceeds `B`; chunks of `B` on both axes,
///   fresh reference statistics per reference chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    SinglePass,
    QueryBatched,
    TwoLevel,
}

impl BatchStrategy {
    pub fn select(n_query: usize, n_reference: usize, batch: usize) -> Self {
        match (n_query > batch, n_reference > batch) {
            (false, false) => BatchStrategy::SinglePass,
            (true, false) => BatchStrategy::QueryBatched,
            (_, true) => BatchStrategy::TwoLevel,
        }
    }

    /// `(query_chunk, reference_chunk)` sizes for this strategy.
    fn chunk_sizes(self, n_query: usize, n_reference: usize, batch: usize) -> (usize, usize) {
        match self {
            BatchStrategy::SinglePass => (n_query, n_reference),
            BatchStrategy::QueryBatched => (batch, n_reference),
            BatchStrategy::TwoLevel => (batch.min(n_query), batch),
        }
    }
}

/// Batch threshold for one engine call.
fn resolve_batch(config: &MatrixProfileConfig) -> usize {
    let batch = config.batch_threshold();
    match config.batch_size {
        Some(_) => debug!("batch threshold {batch} (explicit)"),
        None => debug!(
            "batch threshold {batch} from {} bytes at {:?} complexity",
            config.memory_budget.available_bytes(),
            config.complexity
        ),
    }
    batch
}

/// Compute the self-join matrix profile of every series in `tss`.
///
/// Trivial matches (offsets closer than `ceil(m/2) + 1`) are excluded.
pub fn stomp_self_join(tss: &TimeSeriesSet, config: &MatrixProfileConfig) -> Result<ProfileSet> {
    let m = config.m;
    Error::check_window(m, tss.len())?;
    let batch = resolve_batch(config);

    let profiles = tss
        .iter()
        .enumerate()
        .map(|(i, ts)| join_series(ts, ts, m, true, batch, (i, i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ProfileSet {
        profiles,
        m,
        self_join: true,
    })
}

/// Compute the AB-join of every query series against every reference series.
///
/// Profile `(reference r, query q)` holds, for each subsequence of query
/// series `q`, the distance to and offset of its nearest neighbor in
/// reference series `r`.
pub fn stomp(
    query: &TimeSeriesSet,
    reference: &TimeSeriesSet,
    config: &MatrixProfileConfig,
) -> Result<ProfileSet> {
    let m = config.m;
    Error::check_window(m, query.len())?;
    Error::check_window(m, reference.len())?;
    let batch = resolve_batch(config);

    let mut profiles = Vec::with_capacity(query.width() * reference.width());
    for (r, reference_ts) in reference.iter().enumerate() {
        for (q, query_ts) in query.iter().enumerate() {
            profiles.push(join_series(query_ts, reference_ts, m, false, batch, (q, r))?);
        }
    }

    Ok(ProfileSet {
        profiles,
        m,
        self_join: false,
    })
}

/// Tiled nearest-neighbor reduction of `query_ts` against `reference_ts`.
///
/// For a self-join both slices are the same series and every tile is masked
/// using the global offsets of its query and reference chunks. Inputs are
/// assumed validated.
pub(crate) fn join_series(
    query_ts: &[f64],
    reference_ts: &[f64],
    m: usize,
    self_join: bool,
    batch: usize,
    (query_id, reference_id): (usize, usize),
) -> Result<MatrixProfile> {
    let n_query = query_ts.len() - m + 1;
    let n_reference = reference_ts.len() - m + 1;
    let strategy = BatchStrategy::select(n_query, n_reference, batch);
    let (query_chunk, reference_chunk) = strategy.chunk_sizes(n_query, n_reference, batch);
    debug!(
        "stomp {}: {n_query}x{n_reference} offsets, m={m}, {strategy:?}",
        if self_join { "self-join" } else { "ab-join" }
    );

    let query_stats = RollingStats::compute(query_ts, m)?;
    let whole_reference_stats = match strategy {
        BatchStrategy::TwoLevel => None,
        _ if self_join => Some(query_stats.clone()),
        _ => Some(RollingStats::compute(reference_ts, m)?),
    };
    let whole_reference = whole_reference_stats
        .as_ref()
        .map(|stats| DistanceProfileCalculator::new(reference_ts, stats, m))
        .transpose()?;

    let mut mp = MatrixProfile::new(n_query, m, query_id, reference_id);

    for q0 in (0..n_query).step_by(query_chunk) {
        let q1 = (q0 + query_chunk).min(n_query);
        let mut acc = NeighborAccumulator::new(q1 - q0);

        for r0 in (0..n_reference).step_by(reference_chunk) {
            let r1 = (r0 + reference_chunk).min(n_reference);
            trace!("tile query [{q0}, {q1}) x reference [{r0}, {r1})");

            let mask = self_join.then(|| {
                ExclusionMask::generate(
                    m,
                    Tile {
                        rows: q1 - q0,
                        row_offset: q0,
                        cols: r1 - r0,
                        col_offset: r0,
                    },
                )
            });
            let mask = mask.as_ref().filter(|mk| !mk.is_clear());

            let tile = match &whole_reference {
                Some(calc) => calc.nearest_neighbors(query_ts, &query_stats, m, q0..q1, mask, 0)?,
                None => {
                    let slice = &reference_ts[r0..r1 + m - 1];
                    let chunk_stats = RollingStats::compute(slice, m)?;
                    let calc = DistanceProfileCalculator::new(slice, &chunk_stats, m)?;
                    calc.nearest_neighbors(query_ts, &query_stats, m, q0..q1, mask, r0)?
                }
            };
            acc.fold_tile(&tile);
        }

        acc.write_to_matrix_profile(&mut mp, q0);
    }

    if self_join {
        let unmatched = mp.profile.iter().filter(|d| d.is_infinite()).count();
        if unmatched > 0 {
            warn!("{unmatched} of {n_query} subsequences have no match outside the exclusion band");
        }
    }

    Ok(mp)
}
