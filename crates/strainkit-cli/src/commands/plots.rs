//! Figure descriptions for matched-filter results.

use anyhow::Context;
use clap::Args;
use rustfft::num_complex::Complex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use strainkit_analysis::{FigureOptions, MatchResults, export_figures_json, match_result_figures};
use strainkit_config::EventConfig;

/// Build figure descriptions for each detector's match results.
#[derive(Args)]
pub struct PlotsArgs {
    /// Event config (TOML)
    #[arg(long)]
    pub config: PathBuf,

    /// Matched-filter results (JSON)
    #[arg(long)]
    pub results: PathBuf,

    /// Output directory for figure descriptions
    #[arg(short, long, default_value = "figures")]
    pub output: PathBuf,
}

/// Results file: one entry per detector.
#[derive(Debug, Deserialize)]
pub struct ResultsFile {
    /// Per-detector results.
    pub detectors: Vec<DetectorResults>,
}

/// Matched-filter output for one detector, as stored on disk.
///
/// The template FFT is split into real and imaginary arrays.
#[derive(Debug, Deserialize)]
pub struct DetectorResults {
    /// Detector name; must appear in the event config.
    pub detector: String,
    /// Sample times (GPS seconds).
    pub time: Vec<f64>,
    /// Time of the SNR peak.
    pub timemax: f64,
    /// SNR time series.
    pub snr: Vec<f64>,
    /// Whitened, band-passed strain.
    pub whitened_strain: Vec<f64>,
    /// Whitened, band-passed template.
    pub template_match: Vec<f64>,
    /// Frequencies of the data FFT.
    pub data_freq: Vec<f64>,
    /// Real part of the template FFT.
    pub template_fft_re: Vec<f64>,
    /// Imaginary part of the template FFT.
    pub template_fft_im: Vec<f64>,
    /// Effective distance normalization.
    pub d_eff: f64,
    /// Frequencies of the PSD estimate.
    pub psd_freqs: Vec<f64>,
    /// PSD estimate.
    pub data_psd: Vec<f64>,
}

impl DetectorResults {
    fn template_fft(&self) -> anyhow::Result<Vec<Complex<f64>>> {
        if self.template_fft_re.len() != self.template_fft_im.len() {
            anyhow::bail!(
                "{}: template FFT has {} real and {} imaginary parts",
                self.detector,
                self.template_fft_re.len(),
                self.template_fft_im.len()
            );
        }
        Ok(self
            .template_fft_re
            .iter()
            .zip(&self.template_fft_im)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect())
    }
}

/// Run the plots command.
pub fn run(args: PlotsArgs) -> anyhow::Result<()> {
    let config = EventConfig::load(&args.config)?;
    let text = std::fs::read_to_string(&args.results)
        .with_context(|| format!("reading {}", args.results.display()))?;
    let results: ResultsFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.results.display()))?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let options = FigureOptions {
        event_name: config.name.clone(),
        plot_type: config.plot_type.clone(),
    };

    let mut written = 0;
    for det in &results.detectors {
        written += write_detector_figures(&config, det, &options, &args.output)
            .with_context(|| format!("detector {}", det.detector))?;
    }

    println!("Wrote {written} figure descriptions to {}", args.output.display());
    Ok(())
}

fn write_detector_figures(
    config: &EventConfig,
    det: &DetectorResults,
    options: &FigureOptions,
    dir: &Path,
) -> anyhow::Result<usize> {
    let color = &config.detector(&det.detector)?.color;
    let template_fft = det.template_fft()?;

    let results = MatchResults {
        detector: &det.detector,
        color,
        time: &det.time,
        timemax: det.timemax,
        snr: &det.snr,
        whitened_strain: &det.whitened_strain,
        template_match: &det.template_match,
        tevent: config.tevent,
        data_freq: &det.data_freq,
        template_fft: &template_fft,
        d_eff: det.d_eff,
        psd_freqs: &det.psd_freqs,
        data_psd: &det.data_psd,
    };

    let figures = match_result_figures(&results, options)?;
    for figure in &figures {
        let path = dir.join(format!("{}.json", figure.file_name));
        export_figures_json(std::slice::from_ref(figure), &path)?;
        tracing::debug!(path = %path.display(), "figure written");
    }
    Ok(figures.len())
}
