//! DTMF detection core
//!
//! Detects DTMF (dual-tone multi-frequency) keypad tones in a stream of
//! mono audio samples, reporting each tone's identity, start offset, and
//! duration. The pipeline is a pure transformation:
//!
//! - [`WindowScanner`] slices the stream into fixed-length windows
//! - [`GoertzelAnalyzer`] measures energy at the 8 standard DTMF frequencies
//! - [`ToneClassifier`] validates each window against amplitude, SNR, and
//!   twist thresholds
//! - [`ToneStateMachine`] debounces window classifications into discrete
//!   [`DetectedTone`] events
//!
//! [`DtmfDetector`] composes all four behind a lazy iterator. Audio
//! decoding, capture, and resampling are the caller's concern; the core
//! consumes normalized `f32` samples at a known sample rate.
//!
//! # Example
//! ```
//! use dtmf_detector::{DetectorConfig, DtmfDetector};
//!
//! let detector = DtmfDetector::new(8000, DetectorConfig::default()).unwrap();
//! for event in detector.scan(&[0.0f32; 8000]) {
//!     println!("{event}");
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod detector;
pub mod goertzel;
pub mod scanner;
pub mod state;
pub mod tone;

pub use classifier::{ToneClassifier, WindowClassification};
pub use config::{ConfigError, DetectorConfig, TailPolicy};
pub use detector::{DtmfDetector, ToneEvents};
pub use goertzel::{FrequencyEnergies, GoertzelAnalyzer};
pub use scanner::{Window, WindowScanner};
pub use state::ToneStateMachine;
pub use tone::{DetectedTone, DtmfTone, HIGH_FREQUENCIES, LOW_FREQUENCIES};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default sample rate for telephony audio (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;
