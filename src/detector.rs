//! The composed detection pipeline
//!
//! [`DtmfDetector`] wires the window scanner, the Goertzel filter bank, the
//! classifier, and the tone state machine into a single pull-based
//! pipeline: samples in, a lazy sequence of [`DetectedTone`] events out.

use crate::classifier::ToneClassifier;
use crate::config::{ConfigError, DetectorConfig};
use crate::goertzel::GoertzelAnalyzer;
use crate::scanner::WindowScanner;
use crate::state::ToneStateMachine;
use crate::tone::DetectedTone;

/// DTMF detector over a mono sample stream.
///
/// Construction validates the configuration eagerly; scanning never fails.
/// The detector itself is immutable and reusable: every
/// [`scan`](Self::scan) runs an independent pass with a fresh state
/// machine, so two passes over identical input produce identical events.
///
/// # Example
/// ```
/// use dtmf_detector::{DetectorConfig, DtmfDetector, DtmfTone};
///
/// let detector = DtmfDetector::new(8000, DetectorConfig::default()).unwrap();
///
/// // 250 ms of '5': 770 Hz + 1336 Hz at half amplitude each
/// let samples: Vec<f32> = (0..2000)
///     .map(|i| {
///         let t = i as f32 / 8000.0;
///         0.5 * (2.0 * std::f32::consts::PI * 770.0 * t).sin()
///             + 0.5 * (2.0 * std::f32::consts::PI * 1336.0 * t).sin()
///     })
///     .collect();
///
/// let tones = detector.detect(&samples);
/// assert_eq!(tones.len(), 1);
/// assert_eq!(tones[0].tone, DtmfTone::Five);
/// ```
#[derive(Debug)]
pub struct DtmfDetector {
    sample_rate: u32,
    config: DetectorConfig,
    analyzer: GoertzelAnalyzer,
    classifier: ToneClassifier,
}

impl DtmfDetector {
    /// Create a detector for the given sample rate and configuration.
    ///
    /// Returns a [`ConfigError`] when the configuration violates any
    /// documented invariant (zero sizes, step beyond window, non-finite or
    /// negative thresholds).
    pub fn new(sample_rate: u32, config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sample_rate,
            analyzer: GoertzelAnalyzer::new(sample_rate, config.window_samples),
            classifier: ToneClassifier::new(&config),
            config,
        })
    }

    /// Lazily scan a sample stream for tone events.
    ///
    /// Windows are analyzed on demand as the returned iterator is pulled;
    /// dropping the iterator early simply stops processing. A press still
    /// open when the input ends is finalized up to the last full window.
    pub fn scan<'a>(&'a self, samples: &'a [f32]) -> ToneEvents<'a> {
        ToneEvents {
            scanner: WindowScanner::new(
                samples,
                self.config.window_samples,
                self.config.step_samples,
                self.config.tail_policy,
            ),
            analyzer: &self.analyzer,
            classifier: &self.classifier,
            machine: ToneStateMachine::new(self.sample_rate, &self.config),
            flushed: false,
        }
    }

    /// Scan a sample stream and materialize all events.
    pub fn detect(&self, samples: &[f32]) -> Vec<DetectedTone> {
        self.scan(samples).collect()
    }

    /// The configuration this detector was built with
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Lazy iterator of detected tones over one sample stream.
///
/// Forward-only and consumed once; call [`DtmfDetector::scan`] again for
/// another pass. Events arrive in non-decreasing start order.
#[derive(Debug)]
pub struct ToneEvents<'a> {
    scanner: WindowScanner<'a>,
    analyzer: &'a GoertzelAnalyzer,
    classifier: &'a ToneClassifier,
    machine: ToneStateMachine,
    flushed: bool,
}

impl Iterator for ToneEvents<'_> {
    type Item = DetectedTone;

    fn next(&mut self) -> Option<DetectedTone> {
        for window in self.scanner.by_ref() {
            let energies = self.analyzer.analyze(&window);
            let classification = self.classifier.classify(&energies);
            if let Some(event) = self.machine.push(classification, window.start_sample()) {
                return Some(event);
            }
        }

        if !self.flushed {
            self.flushed = true;
            return self.machine.flush();
        }
        None
    }
}
