//! Event configuration for strainkit.
//!
//! An analysis run is described by a small TOML file naming the event, the
//! detectors and their strain files, and the parameters used by the
//! whitening, band-pass, frequency-shift and plotting steps.
//!
//! # Example
//!
//! ```rust,no_run
//! use strainkit_config::{DetectorConfig, EventConfig};
//!
//! let config = EventConfig::load("GW150914.toml").unwrap();
//! for det in &config.detectors {
//!     println!("{} -> {}", det.name, det.strain_file.display());
//! }
//!
//! let custom = EventConfig::new("GW151226", 1135136350.65)
//!     .with_detector(DetectorConfig::new("H1", "H-H1_LOSC_4_V2-1135136334-32.txt").with_color("r"));
//! custom.save("GW151226.toml").unwrap();
//! ```

mod error;
mod event;

pub use error::ConfigError;
pub use event::{DEFAULT_FBAND, DEFAULT_FSHIFT, DEFAULT_SAMPLE_RATE, DetectorConfig, EventConfig};
