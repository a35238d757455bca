//! Display strain file metadata.

use clap::Args;
use std::path::PathBuf;

use super::common::load_strain;

/// Display strain file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Strain file (.txt or .wav)
    pub file: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let strain = load_strain(&args.file)?;
    let meta = &strain.meta;

    let (min, max) = strain
        .samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let rms = (strain.samples.iter().map(|x| x * x).sum::<f64>() / strain.len() as f64).sqrt();

    println!("File:        {}", args.file.display());
    println!("Detector:    {}", meta.detector.as_deref().unwrap_or("unknown"));
    println!("GPS start:   {}", meta.start_gps);
    println!("GPS stop:    {}", meta.stop_gps());
    println!("Duration:    {:.3}s ({} samples)", meta.duration, strain.len());
    println!("Sample Rate: {} Hz", meta.sample_rate);
    println!("Range:       [{min:.6e}, {max:.6e}]");
    println!("RMS:         {rms:.6e}");

    Ok(())
}
