//! Noise power spectral density estimation.

use clap::Args;
use std::path::PathBuf;
use strainkit_analysis::export_psd_csv;

use super::common::{estimate_psd, load_strain, parse_window, segment_len};

/// Frequencies at which the amplitude spectral density is reported.
const REPORT_FREQS: [f64; 5] = [30.0, 60.0, 100.0, 300.0, 1000.0];

/// Estimate the PSD of a strain series.
#[derive(Args)]
pub struct PsdArgs {
    /// Strain file (.txt or .wav)
    pub input: PathBuf,

    /// Welch segment length in seconds
    #[arg(long, default_value = "4.0")]
    pub segment_secs: f64,

    /// Window function
    #[arg(long, default_value = "hann")]
    pub window: String,

    /// Output CSV file (frequency_hz,power)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the psd command.
pub fn run(args: PsdArgs) -> anyhow::Result<()> {
    let strain = load_strain(&args.input)?;
    let window = parse_window(&args.window)?;
    let spectrum = estimate_psd(&strain, segment_len(args.segment_secs, strain.meta.sample_rate)?, window)?;

    println!("PSD of {}", args.input.display());
    println!("  {} bins, resolution {:.4} Hz", spectrum.len(), spectrum.resolution());

    let asd = spectrum.asd();
    let nyquist = strain.meta.sample_rate / 2.0;
    println!("\n  Frequency (Hz)    ASD (strain/rtHz)");
    for f in REPORT_FREQS.iter().copied().filter(|f| *f <= nyquist) {
        let k = spectrum.frequencies.partition_point(|x| *x < f).min(asd.len() - 1);
        println!("  {:>14.1}    {:.4e}", spectrum.frequencies[k], asd[k]);
    }

    if let Some(output) = args.output {
        export_psd_csv(&spectrum, &output)?;
        println!("\nWrote {}", output.display());
    }

    Ok(())
}
