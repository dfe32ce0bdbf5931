use log::debug;

use crate::core::error::{Error, Result};
use crate::core::matrix_profile::ProfileSet;

/// One selected motif or discord: the pair of subsequences and their distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifRecord {
    pub distance: f64,
    /// Offset of the matched subsequence in the reference series.
    pub reference_index: usize,
    /// Offset of the subsequence in the query series.
    pub query_index: usize,
}

/// Records selected for one `(reference, query)` pair of a [`ProfileSet`].
#[derive(Debug, Clone)]
pub struct MotifSet {
    pub reference: usize,
    pub query: usize,
    pub records: Vec<MotifRecord>,
}

/// Scan order of the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest distances first (motifs).
    Ascending,
    /// Largest distances first (discords).
    Descending,
}

/// Upper bound on mutually non-overlapping windows in a profile of
/// `profile_len` entries: `max(ceil(profile_len / ceil(m/2)), 1)`.
pub fn max_non_overlapping(profile_len: usize, m: usize) -> usize {
    profile_len.div_ceil(m.div_ceil(2).max(1)).max(1)
}

/// Greedily select the best `n` non-overlapping records of one profile.
///
/// Candidates `(index[q], q)` are stably sorted by distance in `direction`
/// and accepted unless both coordinates lie within `ceil(m/2)` of an already
/// accepted record. For self-joins the mirrored pair of every accepted record
/// is excluded too. Non-finite distances are never candidates.
///
/// # Errors
/// - `InvalidArgument` if `m == 0`, the arrays differ in length, or `n`
///   exceeds [`max_non_overlapping`].
/// - `ResultIncomplete` if fewer than `n` records can be accepted.
pub fn select_best_n(
    profile: &[f64],
    index: &[usize],
    m: usize,
    n: usize,
    self_join: bool,
    direction: Direction,
) -> Result<Vec<MotifRecord>> {
    if m == 0 {
        return Err(Error::InvalidArgument(
            "Subsequence length must be > 0".to_string(),
        ));
    }
    if profile.len() != index.len() {
        return Err(Error::size_mismatch(profile.len(), index.len(), "profile/index"));
    }
    Error::check_count(n, max_non_overlapping(profile.len(), m))?;

    let mut candidates: Vec<MotifRecord> = profile
        .iter()
        .zip(index)
        .enumerate()
        .filter(|(_, (d, _))| d.is_finite())
        .map(|(q, (&distance, &r))| MotifRecord {
            distance,
            reference_index: r,
            query_index: q,
        })
        .collect();
    match direction {
        Direction::Ascending => candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance)),
        Direction::Descending => candidates.sort_by(|a, b| b.distance.total_cmp(&a.distance)),
    }

    let half = m.div_ceil(2);
    let overlaps = |a: (usize, usize), b: (usize, usize)| {
        a.0.abs_diff(b.0) < half && a.1.abs_diff(b.1) < half
    };

    let mut selected: Vec<MotifRecord> = Vec::with_capacity(n);
    for cand in candidates {
        if selected.len() == n {
            break;
        }
        let c = (cand.reference_index, cand.query_index);
        let blocked = selected.iter().any(|s| {
            let accepted = (s.reference_index, s.query_index);
            overlaps(c, accepted) || (self_join && overlaps(c, (accepted.1, accepted.0)))
        });
        if !blocked {
            selected.push(cand);
        }
    }

    if selected.len() < n {
        return Err(Error::ResultIncomplete {
            requested: n,
            found: selected.len(),
        });
    }
    Ok(selected)
}

/// Best `n` motifs (smallest distances) of every profile in `set`.
pub fn find_best_n_motifs(set: &ProfileSet, n: usize) -> Result<Vec<MotifSet>> {
    find_best_n(set, n, Direction::Ascending)
}

/// Best `n` discords (largest distances) of every profile in `set`.
pub fn find_best_n_discords(set: &ProfileSet, n: usize) -> Result<Vec<MotifSet>> {
    find_best_n(set, n, Direction::Descending)
}

fn find_best_n(set: &ProfileSet, n: usize, direction: Direction) -> Result<Vec<MotifSet>> {
    if let Some(first) = set.profiles.first() {
        Error::check_count(n, max_non_overlapping(first.len(), set.m))?;
    }
    set.iter()
        .map(|mp| {
            let records = select_best_n(
                &mp.profile,
                &mp.profile_index,
                set.m,
                n,
                set.self_join,
                direction,
            )?;
            debug!(
                "selected {} {direction:?} records for reference {} / query {}",
                records.len(),
                mp.reference,
                mp.query
            );
            Ok(MotifSet {
                reference: mp.reference,
                query: mp.query,
                records,
            })
        })
        .collect()
}
