//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use std::path::Path;
use strainkit_analysis::{
    InterpolatedPsd, PowerSpectrum, Window, band_normalization, bandpass, welch_psd, whiten,
};
use strainkit_io::{AsciiStrainFile, Strain, StrainMeta, StrainSource, read_wav};

/// Biquads per band edge in the band-pass step (4th-order Butterworth edges).
pub const BANDPASS_STAGES: usize = 2;

/// Load strain from a plain-text strain file, or from a WAV file.
///
/// WAV input has no GPS metadata; its series starts at time zero.
pub fn load_strain(path: &Path) -> anyhow::Result<Strain> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));

    let strain = if is_wav {
        let (samples, spec) =
            read_wav(path).with_context(|| format!("reading {}", path.display()))?;
        let sample_rate = f64::from(spec.sample_rate);
        let duration = samples.len() as f64 / sample_rate;
        Strain::new(
            samples,
            StrainMeta {
                detector: None,
                start_gps: 0.0,
                duration,
                sample_rate,
            },
        )
    } else {
        AsciiStrainFile::new(path)
            .load()
            .with_context(|| format!("reading {}", path.display()))?
    };

    if strain.is_empty() {
        anyhow::bail!("{} contains no samples", path.display());
    }
    Ok(strain)
}

/// Parse a window name as accepted on the command line.
pub fn parse_window(name: &str) -> anyhow::Result<Window> {
    match name.to_lowercase().as_str() {
        "hann" => Ok(Window::Hann),
        "hamming" => Ok(Window::Hamming),
        "blackman" => Ok(Window::Blackman),
        "tukey" => Ok(Window::Tukey(0.5)),
        "rectangular" | "rect" | "none" => Ok(Window::Rectangular),
        other => anyhow::bail!("unknown window '{other}' (hann, hamming, blackman, tukey, rectangular)"),
    }
}

/// Convert a segment duration given on the command line to samples.
pub fn segment_len(segment_secs: f64, sample_rate: f64) -> anyhow::Result<usize> {
    if !(segment_secs.is_finite() && segment_secs > 0.0) {
        anyhow::bail!("segment length must be positive, got {segment_secs}");
    }
    Ok((segment_secs * sample_rate).round() as usize)
}

/// Welch PSD of the whole series using segments of `segment_len` samples.
///
/// Series shorter than one segment use a single segment spanning all of it.
pub fn estimate_psd(strain: &Strain, segment_len: usize, window: Window) -> anyhow::Result<PowerSpectrum> {
    if segment_len == 0 {
        anyhow::bail!("segment length must be at least one sample");
    }
    let clamped = segment_len.min(strain.len());
    if clamped < segment_len {
        tracing::warn!(requested = segment_len, segment_len = clamped, "series shorter than one PSD segment");
    }
    Ok(welch_psd(&strain.samples, strain.meta.sample_rate, clamped, window)?)
}

/// Whiten `strain` against an interpolated Welch PSD of itself.
pub fn whiten_strain(strain: &Strain, segment_len: usize) -> anyhow::Result<Vec<f64>> {
    let spectrum = estimate_psd(strain, segment_len, Window::Hann)?;
    let psd = InterpolatedPsd::from_spectrum(&spectrum)?;
    Ok(whiten(&strain.samples, &psd, strain.meta.dt())?)
}

/// Band-pass whitened data to `[low, high]` and rescale to noise units.
pub fn bandpass_whitened(whitened: &[f64], band: [f64; 2], sample_rate: f64) -> anyhow::Result<Vec<f64>> {
    let [low, high] = band;
    let filtered = bandpass(whitened, low, high, sample_rate, BANDPASS_STAGES)?;
    let norm = band_normalization(low, high, sample_rate);
    Ok(filtered.into_iter().map(|x| x / norm).collect())
}

/// Keep the samples within `half_width` seconds of `center` (GPS).
pub fn crop_around(strain: &Strain, samples: &[f64], center: f64, half_width: f64) -> anyhow::Result<Vec<f64>> {
    let times = strain.times();
    let kept: Vec<f64> = times
        .iter()
        .zip(samples)
        .filter(|(t, _)| (**t - center).abs() < half_width)
        .map(|(_, &x)| x)
        .collect();

    if kept.is_empty() {
        anyhow::bail!(
            "no samples within {half_width} s of {center} (data spans {} to {})",
            strain.meta.start_gps,
            strain.meta.stop_gps()
        );
    }
    Ok(kept)
}
