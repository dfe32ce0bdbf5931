use crate::core::error::{Error, Result};

/// Variance below which a window is treated as constant.
pub const VARIANCE_EPSILON: f64 = 1e-10;

/// Index reported for a subsequence with no admissible neighbor (its distance
/// is `+∞`). Never a valid offset.
pub const NO_NEIGHBOR: usize = usize::MAX;

/// Matrix profile of one query series against one reference series.
#[derive(Debug, Clone)]
pub struct MatrixProfile {
    /// Nearest-neighbor distance for each query subsequence.
    pub profile: Vec<f64>,
    /// Offset of the nearest neighbor in the reference series, or
    /// [`NO_NEIGHBOR`] where the distance is `+∞`.
    pub profile_index: Vec<usize>,
    /// Subsequence length used.
    pub m: usize,
    /// Id of the query series within its set.
    pub query: usize,
    /// Id of the reference series within its set.
    pub reference: usize,
}

impl MatrixProfile {
    /// Create a new matrix profile initialized to infinity distances.
    pub fn new(n_subs: usize, m: usize, query: usize, reference: usize) -> Self {
        Self {
            profile: vec![f64::INFINITY; n_subs],
            profile_index: vec![NO_NEIGHBOR; n_subs],
            m,
            query,
            reference,
        }
    }

    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }
}

/// All matrix profiles produced by one engine call.
///
/// A self-join holds one profile per series (`query == reference`); an AB-join
/// holds one per `(reference, query)` pair.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    pub profiles: Vec<MatrixProfile>,
    pub m: usize,
    pub self_join: bool,
}

impl ProfileSet {
    /// Profile of `query` against `reference`, if that pair was computed.
    pub fn get(&self, reference: usize, query: usize) -> Option<&MatrixProfile> {
        self.profiles
            .iter()
            .find(|p| p.reference == reference && p.query == query)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatrixProfile> {
        self.profiles.iter()
    }
}

/// Nearest neighbor of one query subsequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub distance: f64,
    pub index: usize,
}

impl Neighbor {
    /// No admissible neighbor seen yet.
    pub const NONE: Neighbor = Neighbor {
        distance: f64::INFINITY,
        index: NO_NEIGHBOR,
    };
}

/// Rolling mean and standard deviation for all subsequences of length `m`.
///
/// Windowed sums come from cumulative sums of the series and its squares,
/// differenced `m` apart. The series is shifted by its global mean first;
/// variance is shift-invariant and the shift limits cancellation.
#[derive(Debug, Clone)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    /// `(Σt² − 2·Σt·mean + m·mean²) / variance` per window: the squared norm of
    /// the z-normalized window (`m`, or 0 for a constant window).
    pub aux: Vec<f64>,
    /// `1 / std`, zero for constant windows.
    pub sigma_inv: Vec<f64>,
    /// Whether any window had its variance clamped.
    pub has_constant: bool,
}

impl RollingStats {
    /// Compute rolling statistics for subsequences of length `m`.
    ///
    /// Windows whose variance falls below [`VARIANCE_EPSILON`] get their variance
    /// clamped to `VARIANCE_EPSILON²` and are z-normalized to the zero vector.
    ///
    /// # Errors
    /// `InvalidArgument` if `m == 0` or `m > ts.len()`.
    pub fn compute(ts: &[f64], m: usize) -> Result<Self> {
        Error::check_window(m, ts.len())?;

        let n = ts.len();
        let n_subs = n - m + 1;
        let m_f = m as f64;
        let shift = ts.iter().sum::<f64>() / n as f64;

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        for i in 0..n {
            let x = ts[i] - shift;
            cumsum[i + 1] = cumsum[i] + x;
            cumsum_sq[i + 1] = cumsum_sq[i] + x * x;
        }

        let mut mean = vec![0.0; n_subs];
        let mut std = vec![0.0; n_subs];
        let mut aux = vec![0.0; n_subs];
        let mut sigma_inv = vec![0.0; n_subs];
        let mut has_constant = false;

        for i in 0..n_subs {
            let sum = cumsum[i + m] - cumsum[i];
            let sum_sq = cumsum_sq[i + m] - cumsum_sq[i];
            let mu = sum / m_f;
            let var = sum_sq / m_f - mu * mu;
            mean[i] = mu + shift;
            if var < VARIANCE_EPSILON {
                std[i] = VARIANCE_EPSILON;
                has_constant = true;
            } else {
                let sigma = var.sqrt();
                std[i] = sigma;
                sigma_inv[i] = 1.0 / sigma;
                aux[i] = (sum_sq - 2.0 * sum * mu + m_f * mu * mu) / var;
            }
        }

        Ok(Self {
            mean,
            std,
            aux,
            sigma_inv,
            has_constant,
        })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Running element-wise minimum over the tiles of one query chunk.
///
/// Strict `<` keeps the first-encountered minimal index, so folding tiles in
/// increasing reference order is deterministic.
pub(crate) struct NeighborAccumulator {
    pub distances: Vec<f64>,
    pub indices: Vec<usize>,
}

impl NeighborAccumulator {
    pub fn new(n: usize) -> Self {
        Self {
            distances: vec![f64::INFINITY; n],
            indices: vec![NO_NEIGHBOR; n],
        }
    }

    #[inline]
    pub fn update(&mut self, idx: usize, nn: Neighbor) {
        if nn.distance < self.distances[idx] {
            self.distances[idx] = nn.distance;
            self.indices[idx] = nn.index;
        }
    }

    /// Fold a tile's per-row results, row `r` landing at `r`.
    pub fn fold_tile(&mut self, tile: &[Neighbor]) {
        debug_assert_eq!(tile.len(), self.distances.len());
        for (r, &nn) in tile.iter().enumerate() {
            self.update(r, nn);
        }
    }

    /// Copy the accumulated chunk into `mp` starting at `offset`.
    pub fn write_to_matrix_profile(&self, mp: &mut MatrixProfile, offset: usize) {
        let end = offset + self.distances.len();
        mp.profile[offset..end].copy_from_slice(&self.distances);
        mp.profile_index[offset..end].copy_from_slice(&self.indices);
    }
}
