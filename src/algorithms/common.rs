use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::core::error::{Error, Result};

/// Size threshold (n * m) above which we dispatch to the FFT path.
/// Below this, the naive O(n*m) loop wins due to lower constant overhead.
const FFT_THRESHOLD: usize = 256 * 1024;

/// Compute the sliding dot product between a query subsequence `q` and time series `ts`.
///
/// Returns a vector of length `ts.len() - q.len() + 1` where element `i` is
/// `dot(q, ts[i..i+m])`.
///
/// Adaptively dispatches to an FFT-based O(n log n) implementation for large
/// inputs, falling back to the naive O(n*m) loop for small inputs.
///
/// # Errors
/// `InvalidArgument` if `q` is empty or longer than `ts`.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    if ts.len() * q.len() > FFT_THRESHOLD {
        sliding_dot_product_fft(q, ts)
    } else {
        sliding_dot_product_naive(q, ts)
    }
}

/// Naive O(n*m) sliding dot product.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    let m = q.len();
    Error::check_window(m, ts.len())?;
    let n_subs = ts.len() - m + 1;

    Ok((0..n_subs)
        .map(|i| q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum())
        .collect())
}

/// FFT-based O(n log n) sliding dot product via cross-correlation.
pub fn sliding_dot_product_fft(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    SpectralKernel::new(ts, q.len())?.apply(q)
}

/// Sliding dot product against a fixed reference series.
///
/// Every query window of a tile is correlated with the same reference slice,
/// so the reference spectrum is computed once and each query pays one forward
/// and one inverse transform.
pub enum SlidingDotProduct<'a> {
    Naive { reference: &'a [f64], m: usize },
    Spectral(SpectralKernel),
}

impl<'a> SlidingDotProduct<'a> {
    pub fn new(reference: &'a [f64], m: usize) -> Result<Self> {
        Error::check_window(m, reference.len())?;
        if reference.len() * m > FFT_THRESHOLD {
            Ok(Self::Spectral(SpectralKernel::new(reference, m)?))
        } else {
            Ok(Self::Naive { reference, m })
        }
    }

    /// `dot(q, reference[j..j+m])` for every offset `j`; `q.len()` must be `m`.
    pub fn compute(&self, q: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::Naive { reference, m } => {
                if q.len() != *m {
                    return Err(Error::size_mismatch(*m, q.len(), "query window"));
                }
                sliding_dot_product_naive(q, reference)
            }
            Self::Spectral(kernel) => kernel.apply(q),
        }
    }

    /// Number of reference offsets.
    pub fn n_subs(&self) -> usize {
        match self {
            Self::Naive { reference, m } => reference.len() - m + 1,
            Self::Spectral(kernel) => kernel.n_subs,
        }
    }
}

/// Precomputed real FFT of a zero-padded reference series.
pub struct SpectralKernel {
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    spectrum: Vec<Complex<f64>>,
    fft_len: usize,
    m: usize,
    n_subs: usize,
}

impl SpectralKernel {
    pub fn new(reference: &[f64], m: usize) -> Result<Self> {
        Error::check_window(m, reference.len())?;
        let n = reference.len();
        let conv_len = n + m - 1;
        let fft_len = conv_len.next_power_of_two();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        let mut padded = forward.make_input_vec();
        padded[..n].copy_from_slice(reference);
        let mut spectrum = forward.make_output_vec();
        forward.process(&mut padded, &mut spectrum)?;

        Ok(Self {
            forward,
            inverse,
            spectrum,
            fft_len,
            m,
            n_subs: n - m + 1,
        })
    }

    /// Convolve the reversed query with the reference and keep the valid slice.
    pub fn apply(&self, q: &[f64]) -> Result<Vec<f64>> {
        let m = self.m;
        if q.len() != m {
            return Err(Error::size_mismatch(m, q.len(), "query window"));
        }

        let mut q_padded = self.forward.make_input_vec();
        for (dst, &src) in q_padded.iter_mut().zip(q.iter().rev()) {
            *dst = src;
        }
        let mut q_spectrum = self.forward.make_output_vec();
        self.forward.process(&mut q_padded, &mut q_spectrum)?;

        for (q_val, ts_val) in q_spectrum.iter_mut().zip(self.spectrum.iter()) {
            *q_val *= ts_val;
        }
        // Real input: the DC and Nyquist bins carry no imaginary part.
        if let Some(first) = q_spectrum.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = q_spectrum.last_mut() {
            last.im = 0.0;
        }

        let mut result = self.inverse.make_output_vec();
        self.inverse.process(&mut q_spectrum, &mut result)?;

        // realfft inverse is unnormalized
        let norm = 1.0 / self.fft_len as f64;
        Ok(result[m - 1..m - 1 + self.n_subs]
            .iter()
            .map(|&x| x * norm)
            .collect())
    }
}
