//! Matched-filter result figures as plain data.
//!
//! [`match_result_figures`] turns the products of a matched-filter search
//! on one detector into three figure descriptions:
//!
//! 1. `{event}_{det}_SNR.{ext}`: SNR around the peak, full span and zoomed
//! 2. `{event}_{det}_matchtime.{ext}`: whitened strain with the best-fit
//!    template, then the residual
//! 3. `{event}_{det}_matchfreq.{ext}`: detector ASD against the template
//!    spectrum scaled by `sqrt(f)`
//!
//! Nothing is drawn here. A [`Figure`] holds every series, limit, label,
//! and colour a renderer needs, and serializes with serde so it can be
//! handed to any plotting front end (see [`crate::export_figures_json`]).

use std::path::{Path, PathBuf};

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Zoom window around the event used by the time-domain panels, in seconds.
const EVENT_WINDOW: (f64, f64) = (-0.15, 0.05);

/// Whitened strain is plotted in units of noise standard deviation.
const WHITENED_LIMITS: (f64, f64) = (-10.0, 10.0);

/// Lowest frequency shown on the spectrum figure, in Hz.
const MIN_PLOT_FREQ: f64 = 20.0;

/// Strain ASD range shown on the spectrum figure.
const ASD_LIMITS: (f64, f64) = (1e-24, 1e-20);

/// Axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    /// Linear axis.
    Linear,
    /// Base-10 logarithmic axis.
    Log,
}

/// Legend placement inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLocation {
    /// Top left corner.
    UpperLeft,
}

/// One labelled line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// Line colour/style code (matplotlib-style, e.g. `"r"`, `"k"`).
    pub style: String,
    /// Abscissae.
    pub x: Vec<f64>,
    /// Ordinates.
    pub y: Vec<f64>,
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel title, if any.
    pub title: Option<String>,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// X axis range; `None` lets the renderer autoscale.
    pub x_limits: Option<(f64, f64)>,
    /// Y axis range; `None` lets the renderer autoscale.
    pub y_limits: Option<(f64, f64)>,
    /// X axis scaling.
    pub x_scale: AxisScale,
    /// Y axis scaling.
    pub y_scale: AxisScale,
    /// Whether grid lines are drawn.
    pub grid: bool,
    /// Legend placement.
    pub legend: LegendLocation,
    /// Lines in drawing order.
    pub series: Vec<Series>,
}

/// A figure: panels stacked vertically, saved under `file_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// File name including extension, without directory.
    pub file_name: String,
    /// Width and height in inches.
    pub size_inches: (f64, f64),
    /// Panels from top to bottom.
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Path of this figure inside `dir`.
    pub fn path_in(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(&self.file_name)
    }
}

/// Matched-filter products for one detector.
#[derive(Debug, Clone, Copy)]
pub struct MatchResults<'a> {
    /// Detector name, e.g. `"H1"`.
    pub detector: &'a str,
    /// Line style for this detector's data.
    pub color: &'a str,
    /// Sample times (GPS seconds).
    pub time: &'a [f64],
    /// Time of the SNR peak.
    pub timemax: f64,
    /// SNR time series, one value per `time` sample.
    pub snr: &'a [f64],
    /// Whitened, band-passed strain, one value per `time` sample.
    pub whitened_strain: &'a [f64],
    /// Whitened, band-passed template aligned to the data.
    pub template_match: &'a [f64],
    /// Event reference time.
    pub tevent: f64,
    /// Frequencies of the data FFT.
    pub data_freq: &'a [f64],
    /// Template FFT, one bin per `data_freq`.
    pub template_fft: &'a [Complex<f64>],
    /// Effective distance normalization of the template.
    pub d_eff: f64,
    /// Frequencies of the PSD estimate.
    pub psd_freqs: &'a [f64],
    /// PSD estimate, one value per `psd_freqs`.
    pub data_psd: &'a [f64],
}

/// Naming for the generated figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureOptions {
    /// Event name prefix, e.g. `"GW150914"`.
    pub event_name: String,
    /// File extension without the dot, e.g. `"png"`.
    pub plot_type: String,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            event_name: "event".to_string(),
            plot_type: "png".to_string(),
        }
    }
}

/// Build the SNR, time-domain match, and spectrum figures for one detector.
///
/// # Errors
///
/// [`Error::LengthMismatch`] if a series does not line up with its
/// abscissae.
pub fn match_result_figures(results: &MatchResults<'_>, options: &FigureOptions) -> Result<Vec<Figure>> {
    check_len("time and SNR", results.time.len(), results.snr.len())?;
    check_len("time and whitened strain", results.time.len(), results.whitened_strain.len())?;
    check_len("time and template", results.time.len(), results.template_match.len())?;
    check_len("data frequencies and template FFT", results.data_freq.len(), results.template_fft.len())?;
    check_len("PSD frequencies and PSD", results.psd_freqs.len(), results.data_psd.len())?;

    Ok(vec![
        snr_figure(results, options),
        match_time_figure(results, options),
        match_freq_figure(results, options),
    ])
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch { what, expected, actual });
    }
    Ok(())
}

fn file_name(options: &FigureOptions, detector: &str, kind: &str) -> String {
    format!("{}_{}_{}.{}", options.event_name, detector, kind, options.plot_type)
}

fn time_label(timemax: f64) -> String {
    format!("Time since {timemax:.4}")
}

fn relative(time: &[f64], origin: f64) -> Vec<f64> {
    time.iter().map(|t| t - origin).collect()
}

fn snr_figure(r: &MatchResults<'_>, options: &FigureOptions) -> Figure {
    let series = Series {
        label: format!("{} SNR(t)", r.detector),
        style: r.color.to_string(),
        x: relative(r.time, r.timemax),
        y: r.snr.to_vec(),
    };

    let full = Panel {
        title: Some(format!("{} matched filter SNR around event", r.detector)),
        x_label: time_label(r.timemax),
        y_label: "SNR".to_string(),
        x_limits: None,
        y_limits: None,
        x_scale: AxisScale::Linear,
        y_scale: AxisScale::Linear,
        grid: true,
        legend: LegendLocation::UpperLeft,
        series: vec![series.clone()],
    };
    let zoomed = Panel {
        title: None,
        x_limits: Some(EVENT_WINDOW),
        series: vec![series],
        ..full.clone()
    };

    Figure {
        file_name: file_name(options, r.detector, "SNR"),
        size_inches: (10.0, 8.0),
        panels: vec![full, zoomed],
    }
}

fn match_time_figure(r: &MatchResults<'_>, options: &FigureOptions) -> Figure {
    let t = relative(r.time, r.tevent);
    let residual: Vec<f64> = r
        .whitened_strain
        .iter()
        .zip(r.template_match)
        .map(|(d, h)| d - h)
        .collect();

    let data_panel = Panel {
        title: Some(format!("{} whitened data around event", r.detector)),
        x_label: time_label(r.timemax),
        y_label: "whitened strain (units of noise stdev)".to_string(),
        x_limits: Some(EVENT_WINDOW),
        y_limits: Some(WHITENED_LIMITS),
        x_scale: AxisScale::Linear,
        y_scale: AxisScale::Linear,
        grid: true,
        legend: LegendLocation::UpperLeft,
        series: vec![
            Series {
                label: format!("{} whitened h(t)", r.detector),
                style: r.color.to_string(),
                x: t.clone(),
                y: r.whitened_strain.to_vec(),
            },
            Series {
                label: "Template(t)".to_string(),
                style: "k".to_string(),
                x: t.clone(),
                y: r.template_match.to_vec(),
            },
        ],
    };
    let residual_panel = Panel {
        title: Some(format!(
            "{} Residual whitened data after subtracting template around event",
            r.detector
        )),
        series: vec![Series {
            label: format!("{} resid", r.detector),
            style: r.color.to_string(),
            x: t,
            y: residual,
        }],
        ..data_panel.clone()
    };

    Figure {
        file_name: file_name(options, r.detector, "matchtime"),
        size_inches: (10.0, 8.0),
        panels: vec![data_panel, residual_panel],
    }
}

fn match_freq_figure(r: &MatchResults<'_>, options: &FigureOptions) -> Figure {
    let template_f: Vec<f64> = r
        .template_fft
        .iter()
        .zip(r.data_freq)
        .map(|(h, f)| h.norm() * f.abs().sqrt() / r.d_eff)
        .collect();
    let asd: Vec<f64> = r.data_psd.iter().map(|p| p.sqrt()).collect();
    let max_freq = r.data_freq.iter().copied().fold(MIN_PLOT_FREQ, f64::max);

    let panel = Panel {
        title: Some(format!("{} ASD and template around event", r.detector)),
        x_label: "frequency (Hz)".to_string(),
        y_label: "strain noise ASD (strain/rtHz), template h(f)*rt(f)".to_string(),
        x_limits: Some((MIN_PLOT_FREQ, max_freq)),
        y_limits: Some(ASD_LIMITS),
        x_scale: AxisScale::Log,
        y_scale: AxisScale::Log,
        grid: true,
        legend: LegendLocation::UpperLeft,
        series: vec![
            Series {
                label: "template(f)*sqrt(f)".to_string(),
                style: "k".to_string(),
                x: r.data_freq.to_vec(),
                y: template_f,
            },
            Series {
                label: format!("{} ASD", r.detector),
                style: r.color.to_string(),
                x: r.psd_freqs.to_vec(),
                y: asd,
            },
        ],
    };

    Figure {
        file_name: file_name(options, r.detector, "matchfreq"),
        size_inches: (10.0, 6.0),
        panels: vec![panel],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        time: Vec<f64>,
        snr: Vec<f64>,
        whitened: Vec<f64>,
        template: Vec<f64>,
        freqs: Vec<f64>,
        template_fft: Vec<Complex<f64>>,
        psd_freqs: Vec<f64>,
        psd: Vec<f64>,
    }

    impl Fixture {
        fn new() -> Self {
            let time: Vec<f64> = (0..8).map(|i| 100.0 + i as f64 * 0.1).collect();
            Self {
                snr: vec![1.0, 2.0, 3.0, 18.0, 3.0, 2.0, 1.0, 0.5],
                whitened: vec![0.5; 8],
                template: vec![0.25; 8],
                time,
                freqs: vec![0.0, 16.0, 64.0, 512.0],
                template_fft: vec![Complex::new(3.0, 4.0); 4],
                psd_freqs: vec![0.0, 100.0],
                psd: vec![4e-46, 9e-46],
            }
        }

        fn results(&self) -> MatchResults<'_> {
            MatchResults {
                detector: "H1",
                color: "r",
                time: &self.time,
                timemax: 100.3,
                snr: &self.snr,
                whitened_strain: &self.whitened,
                template_match: &self.template,
                tevent: 100.25,
                data_freq: &self.freqs,
                template_fft: &self.template_fft,
                d_eff: 2.0,
                psd_freqs: &self.psd_freqs,
                data_psd: &self.psd,
            }
        }
    }

    fn options() -> FigureOptions {
        FigureOptions {
            event_name: "GW150914".to_string(),
            plot_type: "pdf".to_string(),
        }
    }

    #[test]
    fn test_figure_names() {
        let fixture = Fixture::new();
        let figures = match_result_figures(&fixture.results(), &options()).unwrap();

        let names: Vec<&str> = figures.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["GW150914_H1_SNR.pdf", "GW150914_H1_matchtime.pdf", "GW150914_H1_matchfreq.pdf"]
        );
        assert_eq!(
            figures[0].path_in("figures"),
            PathBuf::from("figures/GW150914_H1_SNR.pdf")
        );
    }

    #[test]
    fn test_snr_figure() {
        let fixture = Fixture::new();
        let figures = match_result_figures(&fixture.results(), &options()).unwrap();
        let snr = &figures[0];

        assert_eq!(snr.panels.len(), 2);
        assert_eq!(snr.panels[0].x_limits, None);
        assert_eq!(snr.panels[1].x_limits, Some((-0.15, 0.05)));
        assert_eq!(snr.panels[0].x_label, "Time since 100.3000");
        assert_eq!(snr.panels[0].series[0].label, "H1 SNR(t)");
        assert_eq!(snr.panels[0].series[0].style, "r");
        assert!((snr.panels[0].series[0].x[3] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_match_time_residual() {
        let fixture = Fixture::new();
        let figures = match_result_figures(&fixture.results(), &options()).unwrap();
        let matchtime = &figures[1];

        assert_eq!(matchtime.panels[0].series.len(), 2);
        assert_eq!(matchtime.panels[0].series[1].style, "k");
        assert_eq!(matchtime.panels[1].y_limits, Some((-10.0, 10.0)));
        assert_eq!(matchtime.panels[1].series[0].label, "H1 resid");
        assert!(matchtime.panels[1].series[0].y.iter().all(|&v| (v - 0.25).abs() < 1e-12));
        assert!((matchtime.panels[1].series[0].x[0] - (-0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_match_freq_scaling() {
        let fixture = Fixture::new();
        let figures = match_result_figures(&fixture.results(), &options()).unwrap();
        let panel = &figures[2].panels[0];

        assert_eq!(panel.x_scale, AxisScale::Log);
        assert_eq!(panel.x_limits, Some((20.0, 512.0)));
        assert_eq!(panel.y_limits, Some((1e-24, 1e-20)));

        // |3+4i| * sqrt(64) / 2 = 20
        assert!((panel.series[0].y[2] - 20.0).abs() < 1e-12);
        assert!((panel.series[1].y[1] - 3e-23).abs() < 1e-35);
    }

    #[test]
    fn test_low_frequency_limit_floor() {
        let mut fixture = Fixture::new();
        fixture.freqs = vec![0.0, 5.0, 10.0, 15.0];
        let figures = match_result_figures(&fixture.results(), &options()).unwrap();
        assert_eq!(figures[2].panels[0].x_limits, Some((20.0, 20.0)));
    }

    #[test]
    fn test_rejects_misaligned_series() {
        let mut fixture = Fixture::new();
        fixture.snr.pop();
        let result = match_result_figures(&fixture.results(), &options());
        assert!(matches!(result, Err(Error::LengthMismatch { what: "time and SNR", .. })));
    }
}
