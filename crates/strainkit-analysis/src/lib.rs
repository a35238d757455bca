//! Strainkit Analysis - Spectral tools for gravitational-wave strain
//!
//! This crate provides the numerical core of strainkit:
//!
//! - [`fft`] - Real-input FFT wrapper, frequency grids, and window functions
//! - [`whiten`] - Spectral whitening against a noise power spectrum
//! - [`shift`] - Frequency shifting of a signal's spectral content
//! - [`psd`] - The PSD provider interface, interpolation, and Welch estimation
//! - [`filter`] - Zero-phase band-pass filtering
//! - [`plot`] - Matched-filter result figures as plain data
//! - [`export`] - CSV and JSON export of analysis results
//!
//! All transforms work on `f64` samples. Strain amplitudes are around 1e-21
//! and their power spectra around 1e-46, which is below the `f32` range.
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use strainkit_analysis::{InterpolatedPsd, Window, freq_shift, welch_psd, whiten};
//!
//! let fs = 4096.0;
//!
//! // 1. Estimate the noise spectrum with 4 second segments
//! let spectrum = welch_psd(&strain, fs, 4 * 4096, Window::Hann)?;
//! let psd = InterpolatedPsd::from_spectrum(&spectrum)?;
//!
//! // 2. Whiten
//! let white = whiten(&strain, &psd, 1.0 / fs)?;
//!
//! // 3. Shift up by 400 Hz to make the chirp audible
//! let shifted = freq_shift(&white, 400.0, fs)?;
//! ```

pub mod export;
pub mod fft;
pub mod filter;
pub mod plot;
pub mod psd;
pub mod shift;
pub mod whiten;

// Re-export main types
pub use export::{export_figures_json, export_psd_csv, import_psd_csv};
pub use fft::{RealFft, Window, rfftfreq};
pub use filter::{Biquad, band_normalization, bandpass};
pub use plot::{AxisScale, Figure, FigureOptions, LegendLocation, MatchResults, Panel, Series, match_result_figures};
pub use psd::{InterpolatedPsd, PowerSpectralDensity, PowerSpectrum, welch_psd};
pub use shift::{FreqShift, freq_shift};
pub use whiten::whiten;

/// Error types for strain analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// Sample spacing is zero, negative, or not finite.
    #[error("sample spacing must be finite and positive, got {0}")]
    InvalidSampleSpacing(f64),

    /// Sample rate is zero, negative, or not finite.
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f64),

    /// Frequency shift is negative or not finite.
    #[error("frequency shift must be finite and non-negative, got {0} Hz")]
    InvalidShift(f64),

    /// PSD grid failed validation.
    #[error("invalid PSD: {0}")]
    InvalidPsd(String),

    /// Band edges are out of order or outside (0, Nyquist).
    #[error("invalid band: {low} Hz to {high} Hz")]
    InvalidBand {
        /// Lower band edge in Hz.
        low: f64,
        /// Upper band edge in Hz.
        high: f64,
    },

    /// Two series that must be the same length are not.
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which pair of series disagreed.
        what: &'static str,
        /// Length of the reference series.
        expected: usize,
        /// Length of the offending series.
        actual: usize,
    },

    /// Welch segment length is zero or longer than the signal.
    #[error("segment length {segment} is invalid for a signal of {signal} samples")]
    InvalidSegment {
        /// Requested segment length in samples.
        segment: usize,
        /// Signal length in samples.
        signal: usize,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Check that a signal has at least one sample.
pub(crate) fn ensure_not_empty(signal: &[f64]) -> Result<()> {
    if signal.is_empty() {
        return Err(Error::EmptySignal);
    }
    Ok(())
}

/// Check that a sample rate is usable.
pub(crate) fn ensure_sample_rate(sample_rate: f64) -> Result<()> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}
