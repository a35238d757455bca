//! Frequency shifting.
//!
//! Moves the whole spectrum of a signal up by a fixed number of Hz. The
//! classic use is making a gravitational-wave chirp audible: a 35-250 Hz
//! chirp shifted by 400 Hz lands where ears and laptop speakers work.
//!
//! The shift is done in whole FFT bins, so the effective shift is
//! `floor(fshift / df) * df` with `df = sample_rate / N`.

use rustfft::num_complex::Complex;

use crate::fft::RealFft;
use crate::{Error, Result, ensure_not_empty, ensure_sample_rate};

/// Shift the spectral content of `data` up by `fshift` Hz.
///
/// The one-sided spectrum is rotated up by `nbins = floor(fshift / df)`
/// bins and the lowest `nbins` bins, which would otherwise hold content
/// wrapped around from above Nyquist, are zeroed. When `nbins` reaches the
/// number of bins the output is silent. The output always has `data.len()`
/// samples, including for odd lengths.
///
/// # Errors
///
/// [`Error::EmptySignal`] for empty input, [`Error::InvalidSampleRate`] for
/// a non-positive sample rate, and [`Error::InvalidShift`] for a negative or
/// non-finite shift. Downward shifts are not supported.
pub fn freq_shift(data: &[f64], fshift: f64, sample_rate: f64) -> Result<Vec<f64>> {
    ensure_not_empty(data)?;
    ensure_sample_rate(sample_rate)?;
    if !(fshift.is_finite() && fshift >= 0.0) {
        return Err(Error::InvalidShift(fshift));
    }

    let n = data.len();
    let fft = RealFft::new(n);
    let mut spectrum = fft.forward(data);

    let df = sample_rate / n as f64;
    let nbins = shift_bins(n, fshift, sample_rate);

    let zero = Complex::new(0.0, 0.0);
    if nbins >= spectrum.len() {
        spectrum.fill(zero);
    } else {
        spectrum.rotate_right(nbins);
        spectrum[..nbins].fill(zero);
    }

    tracing::debug!(samples = n, fshift, df, nbins, "frequency shift");

    Ok(fft.inverse(&spectrum))
}

fn shift_bins(len: usize, fshift: f64, sample_rate: f64) -> usize {
    let duration = len as f64 / sample_rate;
    (fshift / (1.0 / duration)).floor() as usize
}

/// Frequency shift settings.
///
/// Defaults to a 100 Hz shift at 4096 Hz, the rate of the public 4 kHz
/// strain releases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqShift {
    /// Shift in Hz.
    pub fshift: f64,
    /// Sample rate in Hz.
    pub sample_rate: f64,
}

impl Default for FreqShift {
    fn default() -> Self {
        Self {
            fshift: 100.0,
            sample_rate: 4096.0,
        }
    }
}

impl FreqShift {
    /// Create settings for a shift of `fshift` Hz at `sample_rate`.
    pub fn new(fshift: f64, sample_rate: f64) -> Self {
        Self { fshift, sample_rate }
    }

    /// Whole-bin shift applied to a signal of `len` samples.
    pub fn bins_for(&self, len: usize) -> usize {
        shift_bins(len, self.fshift, self.sample_rate)
    }

    /// Apply the shift to `data`.
    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        freq_shift(data, self.fshift, self.sample_rate)
    }
}
