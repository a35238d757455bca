//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Fraction of 16-bit full scale used by [`write_wavfile`].
const HEADROOM: f64 = 0.9;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24, or 32; 32 is stored as float).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Render a signal as a mono 16-bit PCM WAV file.
///
/// The signal is scaled so its largest magnitude maps to 90% of 16-bit full
/// scale, then truncated toward zero. The sample rate is `fs` truncated to
/// whole Hz. An all-zero signal is written as silence.
///
/// # Errors
///
/// [`Error::EmptySignal`] for no samples, [`Error::NonFiniteSample`] if any
/// sample is NaN or infinite, and [`Error::InvalidSampleRate`] if `fs` is
/// below 1 Hz or not finite.
pub fn write_wavfile<P: AsRef<Path>>(path: P, fs: f64, data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptySignal);
    }
    if !(fs.is_finite() && fs >= 1.0 && fs <= u32::MAX as f64) {
        return Err(Error::InvalidSampleRate(fs));
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(Error::NonFiniteSample);
    }

    let peak = data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let full_scale = f64::from(i16::MAX) * HEADROOM;

    let spec = WavSpec {
        channels: 1,
        sample_rate: fs as u32,
        bits_per_sample: 16,
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    for &x in data {
        // Divide first: a subnormal peak would overflow `full_scale / peak`.
        let sample = if peak > 0.0 { x / peak * full_scale } else { 0.0 };
        writer.write_sample(sample as i16)?;
    }
    writer.finalize()?;

    tracing::debug!(samples = data.len(), sample_rate = spec.sample_rate, peak, "wrote wav");
    Ok(())
}

/// Read a WAV file and return samples as f64 along with the spec.
///
/// Integer samples are scaled to [-1, 1). Multi-channel files are mixed
/// down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    let samples: Vec<f64> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = f64::from(1i32 << (spec.bits_per_sample - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}
