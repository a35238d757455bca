//! Real-input FFT wrapper with windowing functions

use rustfft::{FftPlanner, num_complex::Complex};
use std::f64::consts::PI;
use std::sync::Arc;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine)
    Hann,
    /// Hamming window
    Hamming,
    /// Blackman window
    Blackman,
    /// Tukey (tapered cosine) window with the given taper fraction.
    ///
    /// `Tukey(0.0)` is rectangular and `Tukey(1.0)` is a symmetric Hann.
    Tukey(f64),
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f64]) {
        let n = buffer.len();
        match *self {
            Window::Rectangular => {}
            Window::Hann => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos());
                }
            }
            Window::Hamming => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.54 - 0.46 * (2.0 * PI * i as f64 / n as f64).cos();
                }
            }
            Window::Blackman => {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = 2.0 * PI * i as f64 / n as f64;
                    *sample *= 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
                }
            }
            Window::Tukey(alpha) => {
                if alpha <= 0.0 || n < 2 {
                    return;
                }
                let alpha = alpha.min(1.0);
                let last = (n - 1) as f64;
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let x = i as f64 / last;
                    let w = if x < alpha / 2.0 {
                        0.5 * (1.0 + (2.0 * PI / alpha * (x - alpha / 2.0)).cos())
                    } else if x > 1.0 - alpha / 2.0 {
                        0.5 * (1.0 + (2.0 * PI / alpha * (x - 1.0 + alpha / 2.0)).cos())
                    } else {
                        1.0
                    };
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// Sample frequencies for a real-input FFT of `n` samples spaced `dt` apart.
///
/// Returns `n / 2 + 1` bins from DC up to (and for even `n`, including) Nyquist.
pub fn rfftfreq(n: usize, dt: f64) -> Vec<f64> {
    let span = n as f64 * dt;
    (0..=n / 2).map(|k| k as f64 / span).collect()
}

/// Forward/inverse FFT pair for real signals of a fixed length.
///
/// The spectrum of an `n`-sample signal is held as its `n / 2 + 1`
/// non-negative frequency bins; the negative half is implied by conjugate
/// symmetry.
pub struct RealFft {
    forward: Arc<dyn rustfft::Fft<f64>>,
    inverse: Arc<dyn rustfft::Fft<f64>>,
    len: usize,
}

impl RealFft {
    /// Plan transforms for signals of `len` samples.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
            len,
        }
    }

    /// Number of non-negative frequency bins (`len / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.len / 2 + 1
    }

    /// Forward transform of a real signal.
    ///
    /// Input is zero-padded or truncated to the planned length. Returns the
    /// `len / 2 + 1` bins from DC to Nyquist, unnormalized.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.len)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.len, Complex::new(0.0, 0.0));

        self.forward.process(&mut buffer);

        buffer.truncate(self.num_bins());
        buffer
    }

    /// Inverse transform back to exactly `len` real samples.
    ///
    /// Missing bins are treated as zero and surplus bins are ignored. The
    /// imaginary parts of the DC and Nyquist bins do not contribute to a
    /// real output and are dropped.
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<f64> {
        let n = self.len;
        let zero = Complex::new(0.0, 0.0);

        let mut buffer: Vec<Complex<f64>> = (0..n)
            .map(|k| {
                if k <= n / 2 {
                    spectrum.get(k).copied().unwrap_or(zero)
                } else {
                    spectrum.get(n - k).map(|c| c.conj()).unwrap_or(zero)
                }
            })
            .collect();

        self.inverse.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}
