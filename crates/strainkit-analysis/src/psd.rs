//! Power spectral density providers and estimation.
//!
//! Whitening needs the detector noise power at arbitrary frequencies. That
//! capability is the [`PowerSpectralDensity`] trait: a map from a
//! non-negative frequency in Hz to a non-negative power in strain²/Hz.
//!
//! Two providers ship with the crate:
//!
//! - any `Fn(f64) -> f64` closure, for analytic or synthetic spectra
//! - [`InterpolatedPsd`], linear interpolation over a measured grid such as
//!   the output of [`welch_psd`]
//!
//! # Welch's method
//!
//! [`welch_psd`] splits the signal into half-overlapping segments, windows
//! each one, and averages their periodograms. The result is a one-sided
//! density: bins other than DC and Nyquist are doubled so that integrating
//! the spectrum over `[0, fs/2]` recovers the signal variance.
//!
//! ```rust
//! use strainkit_analysis::psd::{InterpolatedPsd, PowerSpectralDensity};
//!
//! let psd = InterpolatedPsd::new(vec![0.0, 10.0, 20.0], vec![1.0, 3.0, 3.0]).unwrap();
//! assert_eq!(psd.power(5.0), 2.0);
//!
//! let flat = |_f: f64| 1.0;
//! assert_eq!(flat.power(1234.0), 1.0);
//! ```

use crate::fft::{RealFft, Window, rfftfreq};
use crate::{Error, Result, ensure_not_empty, ensure_sample_rate};

/// A noise power spectrum callable at any non-negative frequency.
pub trait PowerSpectralDensity {
    /// Noise power at `frequency_hz`, in signal units² per Hz.
    fn power(&self, frequency_hz: f64) -> f64;

    /// Amplitude spectral density (square root of the power).
    fn amplitude(&self, frequency_hz: f64) -> f64 {
        self.power(frequency_hz).sqrt()
    }
}

impl<F: Fn(f64) -> f64> PowerSpectralDensity for F {
    fn power(&self, frequency_hz: f64) -> f64 {
        self(frequency_hz)
    }
}

/// A one-sided power spectrum sampled on a frequency grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    /// Bin frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    /// Power density per bin.
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Number of frequency bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Spacing between adjacent bins in Hz (0 for fewer than two bins).
    pub fn resolution(&self) -> f64 {
        match self.frequencies.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// Amplitude spectral density per bin.
    pub fn asd(&self) -> Vec<f64> {
        self.power.iter().map(|p| p.sqrt()).collect()
    }
}

/// PSD defined by linear interpolation between measured points.
///
/// Queries below the first frequency or above the last return the edge
/// value. A NaN query returns NaN.
#[derive(Debug, Clone)]
pub struct InterpolatedPsd {
    frequencies: Vec<f64>,
    power: Vec<f64>,
}

impl InterpolatedPsd {
    /// Build an interpolator over `frequencies` and matching `power` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the vectors differ in length and
    /// [`Error::InvalidPsd`] if there are fewer than two points, frequencies
    /// are not finite and strictly increasing, or any power is negative or
    /// not finite.
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> Result<Self> {
        if frequencies.len() != power.len() {
            return Err(Error::LengthMismatch {
                what: "PSD frequencies and power",
                expected: frequencies.len(),
                actual: power.len(),
            });
        }
        if frequencies.len() < 2 {
            return Err(Error::InvalidPsd(format!(
                "need at least 2 points, got {}",
                frequencies.len()
            )));
        }
        if let Some(f) = frequencies.iter().find(|f| !f.is_finite()) {
            return Err(Error::InvalidPsd(format!("non-finite frequency {f}")));
        }
        if let Some(pair) = frequencies.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::InvalidPsd(format!(
                "frequencies must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }
        if let Some(p) = power.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(Error::InvalidPsd(format!("power must be finite and non-negative, got {p}")));
        }

        Ok(Self { frequencies, power })
    }

    /// Build an interpolator from an estimated spectrum.
    pub fn from_spectrum(spectrum: &PowerSpectrum) -> Result<Self> {
        Self::new(spectrum.frequencies.clone(), spectrum.power.clone())
    }
}

impl PowerSpectralDensity for InterpolatedPsd {
    fn power(&self, frequency_hz: f64) -> f64 {
        if frequency_hz.is_nan() {
            return f64::NAN;
        }

        let last = self.frequencies.len() - 1;
        if frequency_hz <= self.frequencies[0] {
            return self.power[0];
        }
        if frequency_hz >= self.frequencies[last] {
            return self.power[last];
        }

        let hi = self.frequencies.partition_point(|&f| f <= frequency_hz);
        let lo = hi - 1;
        let (f0, f1) = (self.frequencies[lo], self.frequencies[hi]);
        let (p0, p1) = (self.power[lo], self.power[hi]);
        p0 + (p1 - p0) * (frequency_hz - f0) / (f1 - f0)
    }
}

/// Estimate a one-sided PSD with Welch's method.
///
/// # Arguments
///
/// * `signal` - Time-domain samples
/// * `sample_rate` - Sample rate in Hz
/// * `segment_len` - Samples per segment (sets the resolution `fs / segment_len`)
/// * `window` - Window applied to each segment
///
/// Segments overlap by half. Samples after the last full segment are not
/// used.
pub fn welch_psd(
    signal: &[f64],
    sample_rate: f64,
    segment_len: usize,
    window: Window,
) -> Result<PowerSpectrum> {
    ensure_not_empty(signal)?;
    ensure_sample_rate(sample_rate)?;
    if segment_len == 0 || segment_len > signal.len() {
        return Err(Error::InvalidSegment {
            segment: segment_len,
            signal: signal.len(),
        });
    }

    let hop = (segment_len / 2).max(1);
    let coeffs = window.coefficients(segment_len);
    let window_power: f64 = coeffs.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate * window_power);

    let fft = RealFft::new(segment_len);
    let mut power = vec![0.0; fft.num_bins()];
    let mut segments = 0usize;
    let mut segment = vec![0.0; segment_len];

    let mut start = 0;
    while start + segment_len <= signal.len() {
        for ((dst, &x), &w) in segment
            .iter_mut()
            .zip(&signal[start..start + segment_len])
            .zip(&coeffs)
        {
            *dst = x * w;
        }
        for (acc, bin) in power.iter_mut().zip(fft.forward(&segment)) {
            *acc += bin.norm_sqr();
        }
        segments += 1;
        start += hop;
    }

    let nyquist_bin = if segment_len % 2 == 0 {
        Some(power.len() - 1)
    } else {
        None
    };
    for (k, p) in power.iter_mut().enumerate() {
        *p *= scale / segments as f64;
        if k != 0 && Some(k) != nyquist_bin {
            *p *= 2.0;
        }
    }

    tracing::debug!(segments, segment_len, sample_rate, "welch PSD estimate");

    Ok(PowerSpectrum {
        frequencies: rfftfreq(segment_len, 1.0 / sample_rate),
        power,
    })
}
