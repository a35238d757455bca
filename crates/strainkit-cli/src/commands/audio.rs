//! Render strain as audio.

use clap::Args;
use std::path::PathBuf;
use strainkit_io::write_wavfile;

use super::common::{crop_around, load_strain};

/// Render a strain series as a 16-bit WAV file.
#[derive(Args)]
pub struct AudioArgs {
    /// Strain file (.txt or .wav)
    pub input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Only render samples around this GPS time
    #[arg(long)]
    pub tevent: Option<f64>,

    /// Half-width in seconds of the window around --tevent
    #[arg(long, default_value = "2.0")]
    pub deltat: f64,
}

/// Run the audio command.
pub fn run(args: AudioArgs) -> anyhow::Result<()> {
    let strain = load_strain(&args.input)?;

    let samples = match args.tevent {
        Some(t) => crop_around(&strain, &strain.samples, t, args.deltat)?,
        None => strain.samples.clone(),
    };

    write_wavfile(&args.output, strain.meta.sample_rate, &samples)?;
    println!(
        "Wrote {:.2}s of audio to {}",
        samples.len() as f64 / strain.meta.sample_rate,
        args.output.display()
    );
    Ok(())
}
