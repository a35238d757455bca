//! Event file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Sample rate of the public 4 kHz strain releases.
pub const DEFAULT_SAMPLE_RATE: f64 = 4096.0;

/// Band kept by the band-pass step, in Hz.
pub const DEFAULT_FBAND: [f64; 2] = [43.0, 300.0];

/// Shift applied before rendering audio, in Hz.
pub const DEFAULT_FSHIFT: f64 = 400.0;

/// One detector taking part in an event analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorConfig {
    /// Detector name, e.g. `"H1"`.
    pub name: String,

    /// Strain file for this detector. Relative paths are resolved against
    /// the directory holding the event file.
    pub strain_file: PathBuf,

    /// Line style colour used in figures.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "k".to_string()
}

impl DetectorConfig {
    /// Create a detector entry with the default colour.
    pub fn new(name: impl Into<String>, strain_file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            strain_file: strain_file.into(),
            color: default_color(),
        }
    }

    /// Set the plot colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Strain file path, joined onto `base_dir` when relative.
    pub fn resolved_path(&self, base_dir: &Path) -> PathBuf {
        if self.strain_file.is_absolute() {
            self.strain_file.clone()
        } else {
            base_dir.join(&self.strain_file)
        }
    }
}

/// Parameters for analysing one event.
///
/// # TOML Format
///
/// ```toml
/// name = "GW150914"
/// tevent = 1126259462.422
/// sample_rate = 4096.0
/// fband = [43.0, 300.0]
/// fshift = 400.0
/// plot_type = "png"
/// psd_segment_secs = 4.0
///
/// [[detectors]]
/// name = "H1"
/// strain_file = "H-H1_LOSC_4_V2-1126259446-32.txt"
/// color = "r"
///
/// [[detectors]]
/// name = "L1"
/// strain_file = "L-L1_LOSC_4_V2-1126259446-32.txt"
/// color = "g"
/// ```
///
/// Only `name` and `tevent` are required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventConfig {
    /// Event name, used as the prefix of every output file.
    pub name: String,

    /// GPS time of the event.
    pub tevent: f64,

    /// Sample rate of the strain data in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Band-pass edges `[low, high]` in Hz.
    #[serde(default = "default_fband")]
    pub fband: [f64; 2],

    /// Frequency shift for audio rendering in Hz.
    #[serde(default = "default_fshift")]
    pub fshift: f64,

    /// Figure file extension.
    #[serde(default = "default_plot_type")]
    pub plot_type: String,

    /// Welch segment length for PSD estimation, in seconds.
    #[serde(default = "default_psd_segment_secs")]
    pub psd_segment_secs: f64,

    /// Participating detectors.
    #[serde(default)]
    pub detectors: Vec<DetectorConfig>,
}

fn default_sample_rate() -> f64 {
    DEFAULT_SAMPLE_RATE
}

fn default_fband() -> [f64; 2] {
    DEFAULT_FBAND
}

fn default_fshift() -> f64 {
    DEFAULT_FSHIFT
}

fn default_plot_type() -> String {
    "png".to_string()
}

fn default_psd_segment_secs() -> f64 {
    4.0
}

impl EventConfig {
    /// Create a config with default analysis parameters and no detectors.
    pub fn new(name: impl Into<String>, tevent: f64) -> Self {
        Self {
            name: name.into(),
            tevent,
            sample_rate: default_sample_rate(),
            fband: default_fband(),
            fshift: default_fshift(),
            plot_type: default_plot_type(),
            psd_segment_secs: default_psd_segment_secs(),
            detectors: Vec::new(),
        }
    }

    /// Add a detector.
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Set the band-pass edges.
    pub fn with_fband(mut self, low: f64, high: f64) -> Self {
        self.fband = [low, high];
        self
    }

    /// Set the audio frequency shift.
    pub fn with_fshift(mut self, fshift: f64) -> Self {
        self.fshift = fshift;
        self
    }

    /// Set the figure file extension.
    pub fn with_plot_type(mut self, plot_type: impl Into<String>) -> Self {
        self.plot_type = plot_type.into();
        self
    }

    /// Load and validate an event config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate an event config from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EventConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the config to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field for values the analysis cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("name", "must not be empty"));
        }
        if !self.tevent.is_finite() {
            return Err(ConfigError::invalid("tevent", "must be finite"));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate >= 1.0) {
            return Err(ConfigError::invalid(
                "sample_rate",
                format!("{} is not a usable sample rate", self.sample_rate),
            ));
        }

        let [low, high] = self.fband;
        let nyquist = self.sample_rate / 2.0;
        if !(low > 0.0 && low < high && high < nyquist) {
            return Err(ConfigError::invalid(
                "fband",
                format!("need 0 < low < high < {nyquist}, got [{low}, {high}]"),
            ));
        }

        if !(self.fshift.is_finite() && self.fshift >= 0.0) {
            return Err(ConfigError::invalid(
                "fshift",
                format!("{} is not a non-negative frequency", self.fshift),
            ));
        }
        if self.plot_type.is_empty() || !self.plot_type.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::invalid(
                "plot_type",
                format!("'{}' is not a file extension", self.plot_type),
            ));
        }
        if !(self.psd_segment_secs.is_finite() && self.psd_segment_secs > 0.0) {
            return Err(ConfigError::invalid("psd_segment_secs", "must be positive"));
        }

        let mut seen = HashSet::new();
        for det in &self.detectors {
            if det.name.trim().is_empty() {
                return Err(ConfigError::invalid("detectors", "detector name must not be empty"));
            }
            if !seen.insert(det.name.as_str()) {
                return Err(ConfigError::invalid(
                    "detectors",
                    format!("detector '{}' listed twice", det.name),
                ));
            }
        }

        Ok(())
    }

    /// Look up a detector by name.
    pub fn detector(&self, name: &str) -> Result<&DetectorConfig, ConfigError> {
        self.detectors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ConfigError::DetectorNotFound(name.to_string()))
    }

    /// Welch segment length in samples.
    pub fn psd_segment_len(&self) -> usize {
        (self.psd_segment_secs * self.sample_rate).round() as usize
    }
}
