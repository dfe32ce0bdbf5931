//! Error types for matrix profile computation.

use thiserror::Error;

/// Errors raised by the matrix profile engine.
///
/// Near-constant windows are not an error: they are absorbed by the epsilon
/// clamp in [`RollingStats`](crate::core::matrix_profile::RollingStats).
#[derive(Error, Debug)]
pub enum Error {
    /// Window length, series shape or requested count is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Fewer valid, non-overlapping candidates exist than were requested.
    #[error("Requested {requested} results but only {found} non-overlapping candidates exist")]
    ResultIncomplete { requested: usize, found: usize },

    /// FFT buffer contract violated while convolving.
    #[error("FFT error: {0}")]
    Transform(#[from] realfft::FftError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check that a window of length `m` fits a series of length `len`.
    pub fn check_window(m: usize, len: usize) -> Result<()> {
        if m == 0 {
            return Err(Error::InvalidArgument(
                "Subsequence length must be > 0".to_string(),
            ));
        }
        if m > len {
            return Err(Error::InvalidArgument(format!(
                "Subsequence length {m} exceeds series length {len}"
            )));
        }
        Ok(())
    }

    /// Check that `requested` results can exist when at most `max` are feasible.
    pub fn check_count(requested: usize, max: usize) -> Result<()> {
        if requested > max {
            return Err(Error::InvalidArgument(format!(
                "Cannot extract {requested} non-overlapping results, at most {max} exist"
            )));
        }
        Ok(())
    }

    /// Create an error for paired inputs whose lengths disagree.
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidArgument(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }
}
