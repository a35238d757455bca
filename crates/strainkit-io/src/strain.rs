//! Detector strain time series and their sources.
//!
//! The public strain releases come as HDF5 and as plain text. The text
//! flavour starts with `#` comment lines describing the data, e.g.
//!
//! ```text
//! # Gravitational wave strain for H1_LOSC_4_V2 for GPS 1126259446 - 1126259478
//! # This file has 4096 samples per second
//! # starting GPS 1126259446 duration 32
//! -1.0428999e-19
//! -1.0375044e-19
//! ```
//!
//! followed by one strain value per line. [`AsciiStrainFile`] reads that
//! format; other formats plug in through [`StrainSource`].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Anything that can produce a strain time series.
pub trait StrainSource {
    /// Load the full series.
    fn load(&self) -> Result<Strain>;
}

/// Metadata for a strain segment.
#[derive(Debug, Clone, PartialEq)]
pub struct StrainMeta {
    /// Detector name, e.g. `"H1"`, when the source names it.
    pub detector: Option<String>,
    /// GPS time of the first sample.
    pub start_gps: f64,
    /// Declared duration in seconds.
    pub duration: f64,
    /// Samples per second.
    pub sample_rate: f64,
}

impl StrainMeta {
    /// GPS time at the end of the segment.
    pub fn stop_gps(&self) -> f64 {
        self.start_gps + self.duration
    }

    /// Sample spacing in seconds.
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_rate
    }
}

/// A uniformly sampled strain series with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Strain {
    /// Strain samples.
    pub samples: Vec<f64>,
    /// Timing and provenance.
    pub meta: StrainMeta,
}

impl Strain {
    /// Pair samples with metadata.
    pub fn new(samples: Vec<f64>, meta: StrainMeta) -> Self {
        Self { samples, meta }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// GPS timestamp of every sample: `start_gps + i / sample_rate`.
    pub fn times(&self) -> Vec<f64> {
        let dt = self.meta.dt();
        (0..self.samples.len())
            .map(|i| self.meta.start_gps + i as f64 * dt)
            .collect()
    }
}

/// Plain-text strain file on disk.
#[derive(Debug, Clone)]
pub struct AsciiStrainFile {
    path: PathBuf,
}

impl AsciiStrainFile {
    /// Refer to the file at `path`; nothing is read until [`StrainSource::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StrainSource for AsciiStrainFile {
    fn load(&self) -> Result<Strain> {
        let file = File::open(&self.path)?;
        let strain = parse_strain_txt(BufReader::new(file))?;
        tracing::debug!(
            path = %self.path.display(),
            samples = strain.len(),
            sample_rate = strain.meta.sample_rate,
            "loaded strain"
        );
        Ok(strain)
    }
}

/// Parse the plain-text strain format from any reader.
///
/// # Errors
///
/// [`Error::MissingHeader`] if the sample rate or starting GPS time is not
/// declared, [`Error::Parse`] for a malformed header or sample.
pub fn parse_strain_txt<R: BufRead>(reader: R) -> Result<Strain> {
    let mut detector = None;
    let mut sample_rate = None;
    let mut start = None;
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            let words: Vec<&str> = comment.split_whitespace().collect();
            if let Some(rate) = word_before(&words, "samples") {
                sample_rate = Some(parse_number(rate, line_no, "sample rate")?);
            }
            if let Some(gps) = word_after(&words, "GPS")
                && words.contains(&"starting")
            {
                let t0 = parse_number(gps, line_no, "starting GPS")?;
                let duration = match word_after(&words, "duration") {
                    Some(d) => Some(parse_number(d, line_no, "duration")?),
                    None => None,
                };
                start = Some((t0, duration));
            }
            if let Some(name) = word_after(&words, "for")
                && detector.is_none()
                && name != "GPS"
            {
                detector = name.split('_').next().map(str::to_string);
            }
            continue;
        }

        for token in line.split_whitespace() {
            samples.push(parse_number(token, line_no, "strain sample")?);
        }
    }

    let sample_rate = sample_rate.ok_or(Error::MissingHeader("samples per second"))?;
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    let (start_gps, declared) = start.ok_or(Error::MissingHeader("starting GPS"))?;

    let measured = samples.len() as f64 / sample_rate;
    let duration = declared.unwrap_or(measured);
    if (duration - measured).abs() > 0.5 / sample_rate {
        tracing::warn!(declared = duration, measured, "strain file length disagrees with header");
    }

    Ok(Strain {
        samples,
        meta: StrainMeta {
            detector,
            start_gps,
            duration,
            sample_rate,
        },
    })
}

/// Write a strain series in the plain-text format read by [`AsciiStrainFile`].
pub fn write_strain_txt(path: impl AsRef<Path>, strain: &Strain) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    let meta = &strain.meta;

    match meta.detector.as_deref() {
        Some(name) => writeln!(
            file,
            "# Gravitational wave strain for {} for GPS {} - {}",
            name,
            meta.start_gps,
            meta.stop_gps()
        )?,
        None => writeln!(
            file,
            "# Gravitational wave strain for GPS {} - {}",
            meta.start_gps,
            meta.stop_gps()
        )?,
    }
    writeln!(file, "# This file has {} samples per second", meta.sample_rate)?;
    writeln!(file, "# starting GPS {} duration {}", meta.start_gps, meta.duration)?;
    for x in &strain.samples {
        writeln!(file, "{:e}", x)?;
    }

    file.flush()?;
    Ok(())
}

fn word_before<'a>(words: &[&'a str], marker: &str) -> Option<&'a str> {
    let pos = words.iter().position(|w| *w == marker)?;
    pos.checked_sub(1).map(|i| words[i])
}

fn word_after<'a>(words: &[&'a str], marker: &str) -> Option<&'a str> {
    let pos = words.iter().position(|w| *w == marker)?;
    words.get(pos + 1).copied()
}

fn parse_number(token: &str, line: usize, what: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|e| Error::Parse {
        line,
        message: format!("invalid {what} '{token}': {e}"),
    })
}
