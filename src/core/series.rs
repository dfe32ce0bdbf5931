use crate::core::error::{Error, Result};

/// A dense set of `width` time series sharing the same `len`.
///
/// Stored column-major: each series is contiguous, so a series is borrowed as a
/// plain slice without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesSet {
    data: Vec<f64>,
    len: usize,
    width: usize,
}

impl TimeSeriesSet {
    /// Build a set from individual series, which must all have the same length.
    pub fn new(series: Vec<Vec<f64>>) -> Result<Self> {
        let width = series.len();
        let len = match series.first() {
            Some(s) => s.len(),
            None => {
                return Err(Error::InvalidArgument(
                    "Time series set must contain at least one series".to_string(),
                ))
            }
        };
        if len == 0 {
            return Err(Error::InvalidArgument(
                "Time series must be non-empty".to_string(),
            ));
        }
        if let Some(bad) = series.iter().find(|s| s.len() != len) {
            return Err(Error::size_mismatch(len, bad.len(), "time series set"));
        }

        let mut data = Vec::with_capacity(len * width);
        for s in series {
            data.extend(s);
        }
        Ok(Self { data, len, width })
    }

    /// Build a set from column-major data holding series of length `len`.
    pub fn from_column_major(data: Vec<f64>, len: usize) -> Result<Self> {
        if len == 0 || data.is_empty() {
            return Err(Error::InvalidArgument(
                "Time series must be non-empty".to_string(),
            ));
        }
        if data.len() % len != 0 {
            return Err(Error::InvalidArgument(format!(
                "Data of length {} is not a whole number of series of length {len}",
                data.len()
            )));
        }
        let width = data.len() / len;
        Ok(Self { data, len, width })
    }

    /// A set holding a single series.
    pub fn single(ts: &[f64]) -> Result<Self> {
        Self::new(vec![ts.to_vec()])
    }

    /// Length shared by every series.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of series.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Borrow series `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.width()`.
    pub fn series(&self, i: usize) -> &[f64] {
        &self.data[i * self.len..(i + 1) * self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.len)
    }
}
