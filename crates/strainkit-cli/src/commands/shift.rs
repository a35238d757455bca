//! Shift strain into the audible band.

use clap::Args;
use std::path::PathBuf;
use strainkit_analysis::FreqShift;
use strainkit_io::write_wavfile;

use super::common::{bandpass_whitened, crop_around, load_strain, segment_len, whiten_strain};

/// Shift strain up in frequency and render it as audio.
#[derive(Args)]
pub struct ShiftArgs {
    /// Strain file (.txt or .wav)
    pub input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Frequency shift in Hz
    #[arg(long, default_value = "400.0")]
    pub fshift: f64,

    /// Whiten and band-pass to LOW HIGH Hz before shifting
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    pub band: Option<Vec<f64>>,

    /// Welch segment length in seconds for the PSD estimate used by --band
    #[arg(long, default_value = "4.0")]
    pub segment_secs: f64,

    /// Only render samples around this GPS time
    #[arg(long)]
    pub tevent: Option<f64>,

    /// Half-width in seconds of the window around --tevent
    #[arg(long, default_value = "2.0")]
    pub deltat: f64,
}

/// Run the shift command.
pub fn run(args: ShiftArgs) -> anyhow::Result<()> {
    let strain = load_strain(&args.input)?;
    let fs = strain.meta.sample_rate;

    let data = match args.band.as_deref() {
        Some([low, high]) => {
            let whitened = whiten_strain(&strain, segment_len(args.segment_secs, fs)?)?;
            bandpass_whitened(&whitened, [*low, *high], fs)?
        }
        Some(_) => anyhow::bail!("--band takes exactly two values"),
        None => strain.samples.clone(),
    };

    let shifter = FreqShift::new(args.fshift, fs);
    let shifted = shifter.apply(&data)?;
    tracing::debug!(bins = shifter.bins_for(data.len()), "frequency shift");

    let samples = match args.tevent {
        Some(t) => crop_around(&strain, &shifted, t, args.deltat)?,
        None => shifted,
    };

    write_wavfile(&args.output, fs, &samples)?;
    println!(
        "Shifted by {} Hz, wrote {} samples to {}",
        args.fshift,
        samples.len(),
        args.output.display()
    );
    Ok(())
}
