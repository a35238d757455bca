//! Whiten strain against its own noise estimate.

use clap::Args;
use std::path::PathBuf;
use strainkit_analysis::{InterpolatedPsd, import_psd_csv, whiten};
use strainkit_io::{Strain, write_strain_txt};

use super::common::{bandpass_whitened, load_strain, segment_len, whiten_strain};

/// Whiten a strain series.
#[derive(Args)]
pub struct WhitenArgs {
    /// Strain file (.txt or .wav)
    pub input: PathBuf,

    /// Output strain file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Welch segment length in seconds for the PSD estimate
    #[arg(long, default_value = "4.0")]
    pub segment_secs: f64,

    /// Use a PSD saved by `strainkit psd -o` instead of estimating one
    #[arg(long)]
    pub psd: Option<PathBuf>,

    /// Also band-pass the whitened data to LOW HIGH Hz
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    pub band: Option<Vec<f64>>,
}

/// Run the whiten command.
pub fn run(args: WhitenArgs) -> anyhow::Result<()> {
    let strain = load_strain(&args.input)?;
    let mut whitened = match &args.psd {
        Some(path) => {
            let spectrum = import_psd_csv(path)?;
            let psd = InterpolatedPsd::from_spectrum(&spectrum)?;
            whiten(&strain.samples, &psd, strain.meta.dt())?
        }
        None => whiten_strain(&strain, segment_len(args.segment_secs, strain.meta.sample_rate)?)?,
    };

    if let Some(band) = args.band.as_deref() {
        let [low, high] = band else {
            anyhow::bail!("--band takes exactly two values");
        };
        whitened = bandpass_whitened(&whitened, [*low, *high], strain.meta.sample_rate)?;
    }

    let out = Strain::new(whitened, strain.meta.clone());
    write_strain_txt(&args.output, &out)?;

    tracing::info!(samples = out.len(), output = %args.output.display(), "whitened strain written");
    println!("Wrote {} whitened samples to {}", out.len(), args.output.display());
    Ok(())
}
