//! Integration tests for strainkit-cli.
//!
//! Each test writes a small synthetic strain file, runs the `strainkit`
//! binary on it and inspects what comes out.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::process::Command;
use strainkit_io::{AsciiStrainFile, Strain, StrainMeta, StrainSource, read_wav, write_strain_txt};
use tempfile::TempDir;

const FS: f64 = 256.0;
const START: f64 = 1000.0;
const SAMPLES: usize = 4096;

/// Helper to get the path to the `strainkit` binary built by cargo.
fn strainkit_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_strainkit"))
}

/// 16 s of noise plus a 40 Hz line, written as a plain-text strain file.
fn write_fixture(dir: &Path) -> PathBuf {
    let mut state = 0x2545_f491_u32;
    let samples: Vec<f64> = (0..SAMPLES)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state as i32 as f64) / (i32::MAX as f64);
            let line = 0.5 * (2.0 * PI * 40.0 * i as f64 / FS).sin();
            (noise + line) * 1e-21
        })
        .collect();

    let strain = Strain::new(
        samples,
        StrainMeta {
            detector: Some("H1".into()),
            start_gps: START,
            duration: SAMPLES as f64 / FS,
            sample_rate: FS,
        },
    );
    let path = dir.join("H-H1_TEST-1000-16.txt");
    write_strain_txt(&path, &strain).unwrap();
    path
}

fn assert_success(output: &std::process::Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ---------------------------------------------------------------------------
// Help and metadata
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let output = strainkit_bin().arg("--help").output().expect("failed to run strainkit");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in ["info", "psd", "whiten", "shift", "audio", "plots", "event"] {
        assert!(stdout.contains(cmd), "help should list '{cmd}'");
    }
}

#[test]
fn cli_info_shows_metadata() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());

    let output = strainkit_bin().arg("info").arg(&input).output().unwrap();
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("H1"));
    assert!(stdout.contains("256 Hz"));
    assert!(stdout.contains("4096 samples"));
}

#[test]
fn cli_info_missing_file_fails() {
    let output = strainkit_bin()
        .args(["info", "/nonexistent/strain.txt"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// Spectral commands
// ---------------------------------------------------------------------------

#[test]
fn cli_psd_writes_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());
    let csv = dir.path().join("psd.csv");

    let output = strainkit_bin()
        .arg("psd")
        .arg(&input)
        .arg("-o")
        .arg(&csv)
        .output()
        .unwrap();
    assert_success(&output);

    let content = std::fs::read_to_string(&csv).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("frequency_hz,power"));
    // 4 s segments at 256 Hz -> 1024 samples -> 513 bins
    assert_eq!(lines.count(), 513);
}

#[test]
fn cli_whiten_preserves_length() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());
    let out = dir.path().join("white.txt");

    let output = strainkit_bin()
        .arg("whiten")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--band", "20", "100"])
        .output()
        .unwrap();
    assert_success(&output);

    let whitened = AsciiStrainFile::new(&out).load().unwrap();
    assert_eq!(whitened.len(), SAMPLES);
    assert_eq!(whitened.meta.start_gps, START);
    assert!(whitened.samples.iter().all(|x| x.is_finite()));
}

#[test]
fn cli_whiten_with_saved_psd() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());
    let csv = dir.path().join("psd.csv");
    let out = dir.path().join("white.txt");

    assert_success(&strainkit_bin().arg("psd").arg(&input).arg("-o").arg(&csv).output().unwrap());
    let output = strainkit_bin()
        .arg("whiten")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--psd")
        .arg(&csv)
        .output()
        .unwrap();
    assert_success(&output);

    let whitened = AsciiStrainFile::new(&out).load().unwrap();
    assert_eq!(whitened.len(), SAMPLES);
}

#[test]
fn cli_whiten_rejects_band_above_nyquist() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());

    let output = strainkit_bin()
        .arg("whiten")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("white.txt"))
        .args(["--band", "20", "200"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

#[test]
fn cli_shift_renders_full_length_audio() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());
    let wav = dir.path().join("shifted.wav");

    let output = strainkit_bin()
        .arg("shift")
        .arg(&input)
        .arg("-o")
        .arg(&wav)
        .args(["--fshift", "50"])
        .output()
        .unwrap();
    assert_success(&output);

    let (samples, spec) = read_wav(&wav).unwrap();
    assert_eq!(spec.sample_rate, 256);
    assert_eq!(samples.len(), SAMPLES);
}

#[test]
fn cli_audio_crops_around_event() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(dir.path());
    let wav = dir.path().join("event.wav");

    let output = strainkit_bin()
        .arg("audio")
        .arg(&input)
        .arg("-o")
        .arg(&wav)
        .args(["--tevent", "1008", "--deltat", "1"])
        .output()
        .unwrap();
    assert_success(&output);

    // open interval (1007, 1009) at 256 Hz
    let (samples, _) = read_wav(&wav).unwrap();
    assert_eq!(samples.len(), 511);
}

// ---------------------------------------------------------------------------
// Config driven commands
// ---------------------------------------------------------------------------

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("event.toml");
    std::fs::write(
        &path,
        r#"
name = "GWTEST"
tevent = 1008.0
sample_rate = 256.0
fband = [20.0, 100.0]
fshift = 50.0
plot_type = "pdf"

[[detectors]]
name = "H1"
strain_file = "H-H1_TEST-1000-16.txt"
color = "r"
"#,
    )
    .unwrap();
    path
}

#[test]
fn cli_event_writes_per_detector_outputs() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let config = write_config(dir.path());
    let out = dir.path().join("audio");

    let output = strainkit_bin()
        .arg("event")
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert_success(&output);

    for name in ["GWTEST_H1_whitenbp.txt", "GWTEST_H1_whitenbp.wav", "GWTEST_H1_shifted.wav"] {
        assert!(out.join(name).exists(), "missing {name}");
    }
}

#[test]
fn cli_plots_writes_three_figures() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let results = dir.path().join("results.json");
    std::fs::write(
        &results,
        r#"{
  "detectors": [{
    "detector": "H1",
    "time": [1007.9, 1008.0, 1008.1],
    "timemax": 1008.0,
    "snr": [1.0, 18.0, 2.0],
    "whitened_strain": [0.1, -0.4, 0.2],
    "template_match": [0.0, -0.3, 0.1],
    "data_freq": [0.0, 64.0, 128.0],
    "template_fft_re": [0.0, 1e-22, 2e-23],
    "template_fft_im": [0.0, -1e-22, 0.0],
    "d_eff": 1.5,
    "psd_freqs": [0.0, 64.0, 128.0],
    "data_psd": [1e-44, 1e-46, 1e-45]
  }]
}"#,
    )
    .unwrap();
    let out = dir.path().join("figures");

    let output = strainkit_bin()
        .arg("plots")
        .arg("--config")
        .arg(&config)
        .arg("--results")
        .arg(&results)
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert_success(&output);

    for kind in ["SNR", "matchtime", "matchfreq"] {
        let path = out.join(format!("GWTEST_H1_{kind}.pdf.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(&format!("GWTEST_H1_{kind}.pdf")));
    }
}

#[test]
fn cli_plots_unknown_detector_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let results = dir.path().join("results.json");
    std::fs::write(
        &results,
        r#"{"detectors": [{"detector": "V1", "time": [], "timemax": 0.0, "snr": [],
            "whitened_strain": [], "template_match": [], "data_freq": [],
            "template_fft_re": [], "template_fft_im": [], "d_eff": 1.0,
            "psd_freqs": [], "data_psd": []}]}"#,
    )
    .unwrap();

    let output = strainkit_bin()
        .arg("plots")
        .arg("--config")
        .arg(&config)
        .arg("--results")
        .arg(&results)
        .arg("-o")
        .arg(dir.path().join("figures"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("V1"));
}
