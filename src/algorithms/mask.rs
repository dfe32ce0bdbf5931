//! Trivial-match exclusion masks for tiles of the distance matrix.
//!
//! Rows are query offsets and columns reference offsets, both in global
//! coordinates. A cell is excluded when `|row - col| < band_size(m)`.

use std::ops::Range;

/// Half-width of the trivial-match band: `ceil(m / 2) + 1`.
#[inline]
pub fn band_size(m: usize) -> usize {
    m.div_ceil(2) + 1
}

/// A rectangular tile of the distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub rows: usize,
    pub row_offset: usize,
    pub cols: usize,
    pub col_offset: usize,
}

/// Whether no cell of `tile` can lie within `band` of the diagonal.
///
/// O(1): compares the closest pair of row/column coordinates.
pub fn tile_is_far_from_diagonal(band: usize, tile: &Tile) -> bool {
    if tile.rows == 0 || tile.cols == 0 {
        return true;
    }
    let row_end = tile.row_offset + tile.rows - 1;
    let col_end = tile.col_offset + tile.cols - 1;
    let min_gap = if tile.row_offset > col_end {
        tile.row_offset - col_end
    } else if tile.col_offset > row_end {
        tile.col_offset - row_end
    } else {
        0
    };
    min_gap >= band
}

/// Exclusion mask for one tile.
///
/// The excluded cells of a row are always one contiguous run of columns, so
/// each row stores a single local column range. Tiles far from the diagonal
/// carry no storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionMask {
    tile: Tile,
    bands: Option<Vec<Range<usize>>>,
}

impl ExclusionMask {
    /// Build the mask of `tile` for subsequence length `m`.
    pub fn generate(m: usize, tile: Tile) -> Self {
        let band = band_size(m);
        if tile_is_far_from_diagonal(band, &tile) {
            return Self { tile, bands: None };
        }

        let col_end = tile.col_offset + tile.cols;
        let bands = (0..tile.rows)
            .map(|r| {
                let row = tile.row_offset + r;
                // Columns of this row inside the band, clipped to the tile.
                let lo = (row + 1).saturating_sub(band).max(tile.col_offset);
                let hi = (row + band).min(col_end);
                if lo < hi {
                    lo - tile.col_offset..hi - tile.col_offset
                } else {
                    0..0
                }
            })
            .collect();
        Self {
            tile,
            bands: Some(bands),
        }
    }

    /// Whether every cell is false.
    pub fn is_clear(&self) -> bool {
        self.bands.is_none()
    }

    /// Excluded local columns of local row `r`; empty when none are.
    pub fn excluded_columns(&self, r: usize) -> Range<usize> {
        self.bands
            .as_ref()
            .map_or(0..0, |bands| bands[r].clone())
    }

    /// Whether local cell `(r, c)` is excluded.
    pub fn is_excluded(&self, r: usize, c: usize) -> bool {
        self.excluded_columns(r).contains(&c)
    }

    /// Row-major dense cells.
    pub fn to_dense(&self) -> Vec<bool> {
        let mut cells = vec![false; self.tile.rows * self.tile.cols];
        for r in 0..self.tile.rows {
            for c in self.excluded_columns(r) {
                cells[r * self.tile.cols + c] = true;
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(rows: usize, row_offset: usize, cols: usize, col_offset: usize) -> Tile {
        Tile {
            rows,
            row_offset,
            cols,
            col_offset,
        }
    }

    #[test]
    fn test_band_size() {
        assert_eq!(band_size(1), 2);
        assert_eq!(band_size(3), 3);
        assert_eq!(band_size(4), 3);
        assert_eq!(band_size(8), 5);
    }

    #[test]
    fn test_far_from_diagonal() {
        // rows 0..10, cols 20..30: gap = 20 - 9 = 11
        assert!(tile_is_far_from_diagonal(5, &tile(10, 0, 10, 20)));
        assert!(!tile_is_far_from_diagonal(12, &tile(10, 0, 10, 20)));
        // rows below cols
        assert!(tile_is_far_from_diagonal(3, &tile(4, 10, 4, 0)));
        assert!(!tile_is_far_from_diagonal(8, &tile(4, 10, 4, 0)));
        // overlapping ranges always intersect the diagonal
        assert!(!tile_is_far_from_diagonal(1, &tile(5, 3, 5, 5)));
    }

    #[test]
    fn test_mask_matches_predicate() {
        let m = 5;
        let band = band_size(m);
        let t = tile(12, 4, 15, 0);
        let mask = ExclusionMask::generate(m, t);
        assert!(!mask.is_clear());
        for r in 0..t.rows {
            for c in 0..t.cols {
                let expected = (r + t.row_offset).abs_diff(c + t.col_offset) < band;
                assert_eq!(mask.is_excluded(r, c), expected, "cell ({r}, {c})");
            }
        }
    }

    #[test]
    fn test_far_tile_is_clear() {
        let mask = ExclusionMask::generate(4, tile(8, 0, 8, 100));
        assert!(mask.is_clear());
        assert!(mask.excluded_columns(0).is_empty());
        assert_eq!(mask.to_dense(), vec![false; 64]);
    }

    #[test]
    fn test_square_self_join_mask() {
        // m = 3 -> band 3: |row - col| <= 2 excluded
        let mask = ExclusionMask::generate(3, tile(6, 0, 6, 0));
        assert_eq!(mask.excluded_columns(0), 0..3);
        assert_eq!(mask.excluded_columns(5), 3..6);
        assert_eq!(
            &mask.to_dense()[..6],
            &[true, true, true, false, false, false]
        );
    }

    #[test]
    fn test_tiling_invariance() {
        let m = 6;
        let whole = ExclusionMask::generate(m, tile(20, 0, 20, 0)).to_dense();
        for (row_split, col_split) in [(7, 13), (1, 19), (10, 10)] {
            for (r0, nr) in [(0, row_split), (row_split, 20 - row_split)] {
                for (c0, nc) in [(0, col_split), (col_split, 20 - col_split)] {
                    let part = ExclusionMask::generate(m, tile(nr, r0, nc, c0));
                    for r in 0..nr {
                        for c in 0..nc {
                            assert_eq!(
                                part.is_excluded(r, c),
                                whole[(r0 + r) * 20 + (c0 + c)],
                                "split ({row_split}, {col_split}) cell ({}, {})",
                                r0 + r,
                                c0 + c
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_storage_is_one_range_per_row() {
        let mask = ExclusionMask::generate(8, tile(4096, 0, 4096, 0));
        assert_eq!(mask.excluded_columns(0), 0..5);
        assert_eq!(mask.excluded_columns(100), 96..105);
        assert_eq!(mask.excluded_columns(4095), 4091..4096);
        let bands = mask.bands.as_ref().unwrap();
        assert_eq!(bands.len(), 4096);
    }

    #[test]
    fn test_row_missing_the_band_is_empty() {
        // row 0 against columns 4..10 with band 3: nothing excluded on row 0
        let mask = ExclusionMask::generate(3, tile(6, 0, 6, 4));
        assert!(!mask.is_clear());
        assert!(mask.excluded_columns(0).is_empty());
        assert_eq!(mask.excluded_columns(5), 0..4);
    }
}
