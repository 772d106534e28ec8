//! Detector configuration and eager validation
//!
//! All tuning knobs live here: window geometry, debounce counts, and the
//! classifier thresholds. Invalid settings are rejected up front when the
//! detector is constructed, never mid-stream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a [`DetectorConfig`] fails validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window_samples must be at least 1")]
    WindowSize,

    #[error("step_samples must be at least 1")]
    StepSize,

    #[error("step_samples ({step}) must not exceed window_samples ({window})")]
    StepExceedsWindow { step: usize, window: usize },

    #[error("min_on_windows must be at least 1")]
    MinOnWindows,

    #[error("{name} must be finite and non-negative, got {value}")]
    Threshold { name: &'static str, value: f64 },
}

/// What to do with a tail shorter than one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TailPolicy {
    /// Discard the short tail (default; padding can fabricate spectral
    /// leakage that the classifier then has to reject).
    #[default]
    Drop,
    /// Zero-pad the tail up to a full window and analyze it.
    Pad,
}

/// Tuning parameters for the detection pipeline.
///
/// Defaults follow ITU-T Q.24 guidance at an 8 kHz sample rate: 205-sample
/// windows (~25.6 ms), two consecutive windows to confirm a press (~51 ms)
/// and up to two contradicting windows tolerated inside a press.
///
/// The twist limit is asymmetric, as in standard DTMF receivers: forward
/// twist (low-group louder than high-group) tolerates more imbalance than
/// reverse twist.
///
/// # Example
/// ```
/// use dtmf_detector::DetectorConfig;
///
/// let config = DetectorConfig {
///     min_on_windows: 3,
///     ..DetectorConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Analysis window length in samples
    pub window_samples: usize,
    /// Hop between consecutive windows in samples (== window for no overlap)
    pub step_samples: usize,
    /// Consecutive same-tone windows required before a press is confirmed
    pub min_on_windows: usize,
    /// Contradicting windows tolerated inside a press before it ends
    pub max_gap_windows: usize,
    /// Selected energies must exceed the noise floor by this factor
    pub snr_factor: f64,
    /// Maximum forward twist (low louder than high) in dB
    pub max_twist_db: f64,
    /// Maximum reverse twist (high louder than low) in dB
    pub max_reverse_twist_db: f64,
    /// Absolute minimum normalized energy for each selected component
    pub min_amplitude: f64,
    /// Handling of an input tail shorter than one window
    pub tail_policy: TailPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_samples: 205,
            step_samples: 205,
            min_on_windows: 2,
            max_gap_windows: 2,
            snr_factor: 6.0,
            max_twist_db: 8.0,
            max_reverse_twist_db: 4.0,
            min_amplitude: 1e-2,
            tail_policy: TailPolicy::Drop,
        }
    }
}

impl DetectorConfig {
    /// Check all invariants, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_samples == 0 {
            return Err(ConfigError::WindowSize);
        }
        if self.step_samples == 0 {
            return Err(ConfigError::StepSize);
        }
        if self.step_samples > self.window_samples {
            return Err(ConfigError::StepExceedsWindow {
                step: self.step_samples,
                window: self.window_samples,
            });
        }
        if self.min_on_windows == 0 {
            return Err(ConfigError::MinOnWindows);
        }
        for (name, value) in [
            ("snr_factor", self.snr_factor),
            ("max_twist_db", self.max_twist_db),
            ("max_reverse_twist_db", self.max_reverse_twist_db),
            ("min_amplitude", self.min_amplitude),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Threshold { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = DetectorConfig {
            window_samples: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowSize));
    }

    #[test]
    fn test_zero_step_rejected() {
        let config = DetectorConfig {
            step_samples: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::StepSize));
    }

    #[test]
    fn test_step_beyond_window_rejected() {
        let config = DetectorConfig {
            window_samples: 100,
            step_samples: 101,
            ..DetectorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StepExceedsWindow {
                step: 101,
                window: 100
            })
        );
    }

    #[test]
    fn test_overlapping_step_allowed() {
        let config = DetectorConfig {
            window_samples: 200,
            step_samples: 100,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_thresholds_rejected() {
        for mutate in [
            |c: &mut DetectorConfig| c.snr_factor = -1.0,
            |c: &mut DetectorConfig| c.snr_factor = f64::NAN,
            |c: &mut DetectorConfig| c.max_twist_db = f64::INFINITY,
            |c: &mut DetectorConfig| c.max_reverse_twist_db = -0.5,
            |c: &mut DetectorConfig| c.min_amplitude = f64::NAN,
        ] {
            let mut config = DetectorConfig::default();
            mutate(&mut config);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Threshold { .. })
            ));
        }
    }

    #[test]
    fn test_min_on_windows_rejected_at_zero() {
        let config = DetectorConfig {
            min_on_windows: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MinOnWindows));
    }
}
