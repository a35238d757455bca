//! Whitening and audio rendering for every detector of an event.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use strainkit_analysis::freq_shift;
use strainkit_config::{DetectorConfig, EventConfig};
use strainkit_io::{Strain, write_strain_txt, write_wavfile};

use super::common::{bandpass_whitened, crop_around, load_strain, whiten_strain};

/// Process an event described by a config file.
#[derive(Args)]
pub struct EventArgs {
    /// Event config (TOML)
    #[arg(long)]
    pub config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "audio")]
    pub output: PathBuf,

    /// Half-width in seconds of the audio window around the event
    #[arg(long, default_value = "2.0")]
    pub deltat: f64,
}

/// Run the event command.
pub fn run(args: EventArgs) -> anyhow::Result<()> {
    let config = EventConfig::load(&args.config)?;
    if config.detectors.is_empty() {
        anyhow::bail!("{} lists no detectors", args.config.display());
    }
    let base_dir = args.config.parent().map(PathBuf::from).unwrap_or_default();

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for det in &config.detectors {
        let path = det.resolved_path(&base_dir);
        tracing::info!(detector = %det.name, file = %path.display(), "processing");
        process_detector(&config, det, &path, &args)
            .with_context(|| format!("detector {}", det.name))?;
    }

    println!(
        "Processed {} detectors for {} into {}",
        config.detectors.len(),
        config.name,
        args.output.display()
    );
    Ok(())
}

fn process_detector(
    config: &EventConfig,
    det: &DetectorConfig,
    path: &std::path::Path,
    args: &EventArgs,
) -> anyhow::Result<()> {
    let strain = load_strain(path)?;
    let fs = strain.meta.sample_rate;
    if (fs - config.sample_rate).abs() > f64::EPSILON * fs {
        tracing::warn!(file_rate = fs, config_rate = config.sample_rate, "sample rate differs from config");
    }

    let whitened = whiten_strain(&strain, config.psd_segment_len())?;
    let whitenbp = bandpass_whitened(&whitened, config.fband, fs)?;
    let shifted = freq_shift(&whitenbp, config.fshift, fs)?;

    let prefix = format!("{}_{}", config.name, det.name);

    let series = Strain::new(whitenbp.clone(), strain.meta.clone());
    write_strain_txt(args.output.join(format!("{prefix}_whitenbp.txt")), &series)?;

    let audio = crop_around(&strain, &whitenbp, config.tevent, args.deltat)?;
    write_wavfile(args.output.join(format!("{prefix}_whitenbp.wav")), fs, &audio)?;

    let audio = crop_around(&strain, &shifted, config.tevent, args.deltat)?;
    write_wavfile(args.output.join(format!("{prefix}_shifted.wav")), fs, &audio)?;

    Ok(())
}
