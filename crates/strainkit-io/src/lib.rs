//! File I/O for strainkit.
//!
//! This crate provides:
//!
//! - **Strain input**: the [`StrainSource`] trait and [`AsciiStrainFile`],
//!   a reader for the plain-text strain releases (header comments followed
//!   by one sample per line)
//! - **Audio output**: [`write_wavfile`] renders a signal as 16-bit PCM
//!   normalized to 90% of full scale, plus [`read_wav`] for WAV input
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strainkit_io::{AsciiStrainFile, StrainSource, write_wavfile};
//!
//! let strain = AsciiStrainFile::new("H-H1_LOSC_4_V2-1126259446-32.txt").load()?;
//! println!("{} samples from GPS {}", strain.len(), strain.meta.start_gps);
//!
//! write_wavfile("H1.wav", strain.meta.sample_rate, &strain.samples)?;
//! ```

mod strain;
mod wav;

pub use strain::{AsciiStrainFile, Strain, StrainMeta, StrainSource, parse_strain_txt, write_strain_txt};
pub use wav::{WavSpec, read_wav, write_wavfile};

/// Error types for strain and audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// There are no samples to write.
    #[error("signal is empty")]
    EmptySignal,

    /// The signal contains NaN or infinite samples.
    #[error("signal contains non-finite samples")]
    NonFiniteSample,

    /// Sample rate does not give at least 1 Hz.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// A strain file line could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A required strain file header is absent.
    #[error("missing header: {0}")]
    MissingHeader(&'static str),
}

/// Convenience result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
