//! Export formats for analysis results.
//!
//! - CSV for power spectra (`frequency_hz,power`), readable back with
//!   [`import_psd_csv`] so an estimate can be reused across runs
//! - JSON for figure descriptions, consumed by external renderers

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::plot::Figure;
use crate::psd::PowerSpectrum;
use crate::Result;

/// Export a power spectrum to CSV.
///
/// Writes a `frequency_hz,power` header followed by one bin per line.
pub fn export_psd_csv(spectrum: &PowerSpectrum, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);

    writeln!(file, "frequency_hz,power")?;
    for (freq, power) in spectrum.frequencies.iter().zip(&spectrum.power) {
        writeln!(file, "{:.6},{:.6e}", freq, power)?;
    }

    file.flush()?;
    Ok(())
}

/// Import a power spectrum from CSV.
///
/// Lines that are empty, start with `#`, or do not parse as two numbers
/// (such as the header) are skipped.
pub fn import_psd_csv(path: impl AsRef<Path>) -> Result<PowerSpectrum> {
    let reader = BufReader::new(std::fs::File::open(path)?);

    let mut frequencies = Vec::new();
    let mut power = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((f, p)) = line.split_once(',')
            && let (Ok(f), Ok(p)) = (f.trim().parse::<f64>(), p.trim().parse::<f64>())
        {
            frequencies.push(f);
            power.push(p);
        }
    }

    Ok(PowerSpectrum { frequencies, power })
}

/// Export figure descriptions as pretty-printed JSON.
pub fn export_figures_json(figures: &[Figure], path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut file, figures)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{AxisScale, LegendLocation, Panel, Series};
    use tempfile::NamedTempFile;

    #[test]
    fn test_psd_csv_roundtrip() {
        let spectrum = PowerSpectrum {
            frequencies: vec![0.0, 0.25, 0.5],
            power: vec![1.5e-46, 2.25e-44, 3.0e-47],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_psd_csv(&spectrum, temp_file.path()).unwrap();
        let loaded = import_psd_csv(temp_file.path()).unwrap();

        assert_eq!(loaded.frequencies, spectrum.frequencies);
        for (a, b) in loaded.power.iter().zip(&spectrum.power) {
            assert!((a - b).abs() / b < 1e-6);
        }
    }

    #[test]
    fn test_psd_csv_header() {
        let spectrum = PowerSpectrum {
            frequencies: vec![10.0],
            power: vec![1.0],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_psd_csv(&spectrum, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("frequency_hz,power\n"));
        assert!(content.contains("10.000000,1.000000e0"));
    }

    #[test]
    fn test_psd_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");

        assert!(matches!(import_psd_csv(&missing), Err(crate::Error::Io(_))));

        let spectrum = PowerSpectrum {
            frequencies: vec![1.0],
            power: vec![1.0],
        };
        let nested = dir.path().join("no_such_dir").join("psd.csv");
        assert!(matches!(export_psd_csv(&spectrum, &nested), Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_figures_json() {
        let figure = Figure {
            file_name: "ev_L1_SNR.png".to_string(),
            size_inches: (10.0, 8.0),
            panels: vec![Panel {
                title: None,
                x_label: "t".to_string(),
                y_label: "SNR".to_string(),
                x_limits: Some((-0.15, 0.05)),
                y_limits: None,
                x_scale: AxisScale::Linear,
                y_scale: AxisScale::Log,
                grid: true,
                legend: LegendLocation::UpperLeft,
                series: vec![Series {
                    label: "L1 SNR(t)".to_string(),
                    style: "g".to_string(),
                    x: vec![0.0, 1.0],
                    y: vec![2.0, 3.0],
                }],
            }],
        };

        let temp_file = NamedTempFile::new().unwrap();
        export_figures_json(std::slice::from_ref(&figure), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"upper_left\""));
        assert!(content.contains("\"log\""));

        let loaded: Vec<Figure> = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].file_name, figure.file_name);
        assert_eq!(loaded[0].panels[0].y_scale, AxisScale::Log);
        assert_eq!(loaded[0].panels[0].series, figure.panels[0].series);
        let (lo, hi) = loaded[0].panels[0].x_limits.unwrap();
        assert!((lo + 0.15).abs() < 1e-12 && (hi - 0.05).abs() < 1e-12);
    }
}
