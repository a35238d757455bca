//! Spectral whitening.
//!
//! Whitening divides each frequency bin of a signal by the local noise
//! amplitude, so that stationary noise described by the PSD comes out with a
//! flat spectrum. Transient signals then stand out at the frequencies where
//! the detector is quiet instead of being buried under the low-frequency
//! seismic wall.

use crate::fft::{RealFft, rfftfreq};
use crate::psd::PowerSpectralDensity;
use crate::{Error, Result, ensure_not_empty};

/// Whiten `strain` against a noise power spectrum.
///
/// Each bin `k` of the real FFT is divided by `sqrt(psd(f_k)) * sqrt(2 * dt)`
/// where `f_k = k / (N * dt)`, then the spectrum is transformed back to
/// exactly `N` samples.
///
/// With a unit PSD the result is `strain / sqrt(2 * dt)`.
///
/// A PSD that is zero or negative at a queried frequency produces
/// infinite or NaN samples. This is logged but not rejected.
///
/// # Errors
///
/// [`Error::EmptySignal`] for an empty input and
/// [`Error::InvalidSampleSpacing`] if `dt` is not finite and positive.
pub fn whiten<P>(strain: &[f64], psd: &P, dt: f64) -> Result<Vec<f64>>
where
    P: PowerSpectralDensity + ?Sized,
{
    ensure_not_empty(strain)?;
    if !(dt.is_finite() && dt > 0.0) {
        return Err(Error::InvalidSampleSpacing(dt));
    }

    let n = strain.len();
    let fft = RealFft::new(n);
    let freqs = rfftfreq(n, dt);
    let mut spectrum = fft.forward(strain);

    let norm = 1.0 / (1.0 / (2.0 * dt)).sqrt();
    let mut degenerate = 0usize;

    for (bin, &f) in spectrum.iter_mut().zip(&freqs) {
        let power = psd.power(f);
        if power.is_nan() || power <= 0.0 {
            degenerate += 1;
        }
        *bin /= power.sqrt() * norm;
    }

    if degenerate > 0 {
        tracing::warn!(
            bins = degenerate,
            total = freqs.len(),
            "PSD is zero, negative, or NaN at some frequencies; whitened output will not be finite"
        );
    }
    tracing::debug!(samples = n, dt, "whitened strain");

    Ok(fft.inverse(&spectrum))
}
