//! Per-window tone validation
//!
//! Turns the eight bin energies of one window into either a single tone
//! candidate or `NoTone`. A candidate must clear three gates: an absolute
//! amplitude floor, a signal-to-noise margin over the remaining bins, and
//! the DTMF twist tolerance between its two components.

use crate::config::DetectorConfig;
use crate::goertzel::FrequencyEnergies;
use crate::tone::DtmfTone;

/// Energies closer than this are treated as tied (lower frequency wins)
const TIE_EPSILON: f64 = 1e-9;

/// Score mapping span: 20 dB above threshold maps to confidence 1.0
const SCORE_SPAN_DB: f64 = 20.0;

/// Classification of a single analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowClassification {
    /// No valid DTMF tone in this window
    NoTone,
    /// Exactly one valid tone, with a normalized confidence in [0, 1]
    Candidate { tone: DtmfTone, score: f64 },
}

impl WindowClassification {
    /// The candidate tone, if any
    pub fn tone(&self) -> Option<DtmfTone> {
        match self {
            WindowClassification::Candidate { tone, .. } => Some(*tone),
            WindowClassification::NoTone => None,
        }
    }
}

/// Validates window energies against amplitude, SNR, and twist thresholds.
#[derive(Debug, Clone)]
pub struct ToneClassifier {
    snr_factor: f64,
    max_twist_db: f64,
    max_reverse_twist_db: f64,
    min_amplitude: f64,
}

impl ToneClassifier {
    /// Build a classifier from the detector configuration.
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            snr_factor: config.snr_factor,
            max_twist_db: config.max_twist_db,
            max_reverse_twist_db: config.max_reverse_twist_db,
            min_amplitude: config.min_amplitude,
        }
    }

    /// Classify one window's energies.
    ///
    /// Always deterministic: near-tied energies within a group resolve to
    /// the lower frequency, so a borderline window cannot oscillate between
    /// two tones across identical runs.
    pub fn classify(&self, energies: &FrequencyEnergies) -> WindowClassification {
        let low_index = strongest(&energies.low);
        let high_index = strongest(&energies.high);
        let low_energy = energies.low[low_index];
        let high_energy = energies.high[high_index];

        // Gate 1: absolute amplitude floor (also rules out zero energies
        // before they can reach the twist division below)
        if low_energy < self.min_amplitude || high_energy < self.min_amplitude {
            return WindowClassification::NoTone;
        }
        if low_energy <= 0.0 || high_energy <= 0.0 {
            return WindowClassification::NoTone;
        }

        // Gate 2: both components must stand clear of the noise floor,
        // estimated from the six non-selected bins
        let noise_floor = self.noise_floor(energies, low_index, high_index);
        let snr_threshold = self.snr_factor * noise_floor;
        if low_energy < snr_threshold || high_energy < snr_threshold {
            return WindowClassification::NoTone;
        }

        // Gate 3: twist tolerance, asymmetric per standard DTMF receivers
        let twist_db = 10.0 * (low_energy / high_energy).log10();
        if twist_db > self.max_twist_db || -twist_db > self.max_reverse_twist_db {
            return WindowClassification::NoTone;
        }

        let tone = match DtmfTone::from_frequency_pair(low_index, high_index) {
            Some(tone) => tone,
            None => return WindowClassification::NoTone,
        };

        let score = self.score(low_energy.min(high_energy), snr_threshold);
        WindowClassification::Candidate { tone, score }
    }

    /// Mean energy of the six bins not selected as tone components.
    fn noise_floor(
        &self,
        energies: &FrequencyEnergies,
        low_index: usize,
        high_index: usize,
    ) -> f64 {
        let mut sum = 0.0;
        for (i, &energy) in energies.low.iter().enumerate() {
            if i != low_index {
                sum += energy;
            }
        }
        for (i, &energy) in energies.high.iter().enumerate() {
            if i != high_index {
                sum += energy;
            }
        }
        sum / 6.0
    }

    /// Confidence from the weaker component's margin over its effective
    /// threshold, mapped through dB into [0, 1].
    fn score(&self, weaker_energy: f64, snr_threshold: f64) -> f64 {
        let threshold = snr_threshold.max(self.min_amplitude);
        let margin_db = 10.0 * (weaker_energy / threshold).log10();
        (margin_db / SCORE_SPAN_DB).clamp(0.0, 1.0)
    }
}

/// Index of the largest energy; ties within [`TIE_EPSILON`] keep the
/// earlier (lower-frequency) bin.
fn strongest(energies: &[f64; 4]) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if energies[i] > energies[best] + TIE_EPSILON {
            best = i;
        }
    }
    best
}
