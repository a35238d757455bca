//! Zero-phase band-pass filtering.
//!
//! Whitened strain still carries power far outside the band where compact
//! binary signals live. [`bandpass`] keeps `[low, high]` using Butterworth
//! high-pass and low-pass cascades built from RBJ cookbook biquads, run
//! forward and then backward over the signal. The result has no phase
//! distortion and the magnitude response is squared, so each band edge sits
//! at -6 dB rather than the usual Butterworth -3 dB.
//!
//! To limit start-up transients the signal is first extended at both ends
//! by an odd reflection about its end points, and the extension is cut off
//! afterwards.

use std::f64::consts::PI;

use crate::{Error, Result, ensure_not_empty, ensure_sample_rate};

/// Second-order IIR section, Direct Form I.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Create a section from raw coefficients, normalized by `a0`.
    pub fn new(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// RBJ low-pass section at `frequency` Hz.
    pub fn lowpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        Self::new(
            (1.0 - cos_omega) / 2.0,
            1.0 - cos_omega,
            (1.0 - cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// RBJ high-pass section at `frequency` Hz.
    pub fn highpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = omega.cos();
        let alpha = omega.sin() / (2.0 * q);

        Self::new(
            (1.0 + cos_omega) / 2.0,
            -(1.0 + cos_omega),
            (1.0 + cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clear the delay lines, keeping the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Zero-phase band-pass between `low` and `high` Hz.
///
/// Each edge is a Butterworth filter of order `2 * stages`, factored into
/// `stages` biquads with the Butterworth pole Qs. After the forward and
/// backward passes the gain at `low` and `high` is one half (-6 dB) and the
/// roll-off is `24 * stages` dB/octave.
///
/// # Errors
///
/// [`Error::InvalidBand`] unless `0 < low < high < sample_rate / 2`.
pub fn bandpass(
    signal: &[f64],
    low: f64,
    high: f64,
    sample_rate: f64,
    stages: usize,
) -> Result<Vec<f64>> {
    ensure_not_empty(signal)?;
    ensure_sample_rate(sample_rate)?;
    if !(low > 0.0 && high > low && high < sample_rate / 2.0) {
        return Err(Error::InvalidBand { low, high });
    }

    let stages = stages.max(1);
    let qs: Vec<f64> = (0..stages).map(|k| butterworth_q(k, stages)).collect();
    let mut sections: Vec<Biquad> = qs
        .iter()
        .map(|&q| Biquad::highpass(low, q, sample_rate))
        .chain(qs.iter().map(|&q| Biquad::lowpass(high, q, sample_rate)))
        .collect();

    let pad = (6 * stages).min(signal.len() - 1);
    let mut buffer = odd_extension(signal, pad);

    run_cascade(&mut sections, &mut buffer);
    buffer.reverse();
    sections.iter_mut().for_each(Biquad::clear);
    run_cascade(&mut sections, &mut buffer);
    buffer.reverse();

    tracing::debug!(low, high, sample_rate, stages, "band-pass");

    Ok(buffer[pad..pad + signal.len()].to_vec())
}

/// Amplitude normalization for band-passed whitened data.
///
/// Whitened noise has unit variance across the full band. Treating
/// `[low, high]` as an ideal brick-wall band, keeping it scales the variance
/// by `(high - low) / (fs / 2)`. Dividing by the square root brings the
/// result back to roughly unit noise standard deviation; the filter's finite
/// roll-off makes the true noise bandwidth differ by a few percent.
pub fn band_normalization(low: f64, high: f64, sample_rate: f64) -> f64 {
    ((high - low) / (sample_rate / 2.0)).sqrt()
}

/// Q of the `k`-th biquad in a Butterworth filter of order `2 * stages`.
fn butterworth_q(k: usize, stages: usize) -> f64 {
    let angle = (2 * k + 1) as f64 * PI / (4 * stages) as f64;
    1.0 / (2.0 * angle.sin())
}

fn run_cascade(sections: &mut [Biquad], buffer: &mut [f64]) {
    for section in sections.iter_mut() {
        for sample in buffer.iter_mut() {
            *sample = section.process(*sample);
        }
    }
}

/// Extend `x` by `pad` samples at each end, reflected oddly about the end
/// points: `2*x[0] - x[pad..1]` before and `2*x[n-1] - x[n-2..n-1-pad]` after.
fn odd_extension(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}
