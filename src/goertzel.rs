//! Goertzel filter bank over the eight standard DTMF frequencies
//!
//! The Goertzel algorithm evaluates the DFT at a single bin with a
//! second-order recursion, which is far cheaper than a full transform when
//! only eight fixed frequencies are of interest. One [`GoertzelAnalyzer`]
//! runs all eight recursions in a single pass over a window.

use crate::scanner::Window;
use crate::tone::{HIGH_FREQUENCIES, LOW_FREQUENCIES};

/// Number of target frequencies (4 low-group + 4 high-group)
const BIN_COUNT: usize = 8;

/// Normalized energy at each of the eight DTMF frequencies for one window.
///
/// Energies are non-negative and scaled so a sine component of amplitude
/// `A` at a bin frequency yields an energy near `A²`, independent of the
/// window length. Lives only for the duration of one classification step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEnergies {
    /// Energies at 697, 770, 852, 941 Hz
    pub low: [f64; 4],
    /// Energies at 1209, 1336, 1477, 1633 Hz
    pub high: [f64; 4],
}

/// Fixed-window Goertzel analyzer for the eight DTMF frequencies.
///
/// Coefficients are precomputed for a given sample rate and window length;
/// [`analyze`](Self::analyze) is then a pure function of the window. The
/// recursion accumulates in `f64` to bound numerical drift over the window.
///
/// # Example
/// ```
/// use dtmf_detector::{GoertzelAnalyzer, Window};
///
/// let analyzer = GoertzelAnalyzer::new(8000, 205);
/// let samples: Vec<f32> = (0..205)
///     .map(|i| (2.0 * std::f32::consts::PI * 770.0 * i as f32 / 8000.0).sin())
///     .collect();
/// let energies = analyzer.analyze(&Window::borrowed(&samples, 0));
/// // 770 Hz is low-group bin 1
/// assert!(energies.low[1] > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct GoertzelAnalyzer {
    /// Sample rate in Hz
    sample_rate: u32,
    /// Window length in samples (N)
    window_samples: usize,
    /// Precomputed 2*cos(2*pi*f/fs), low group then high group
    coeffs: [f64; BIN_COUNT],
    /// Normalization factor 1 / (N/2)^2
    norm: f64,
}

impl GoertzelAnalyzer {
    /// Create an analyzer for a fixed sample rate and window length.
    pub fn new(sample_rate: u32, window_samples: usize) -> Self {
        let mut coeffs = [0.0; BIN_COUNT];
        for (i, freq) in LOW_FREQUENCIES
            .iter()
            .chain(HIGH_FREQUENCIES.iter())
            .enumerate()
        {
            let omega = 2.0 * std::f64::consts::PI * (*freq as f64) / sample_rate as f64;
            coeffs[i] = 2.0 * omega.cos();
        }

        let half_n = window_samples.max(1) as f64 / 2.0;

        Self {
            sample_rate,
            window_samples: window_samples.max(1),
            coeffs,
            norm: 1.0 / (half_n * half_n),
        }
    }

    /// Compute the normalized energy at each target frequency.
    ///
    /// Non-finite samples (NaN or infinity) are sanitized to zero before
    /// entering the recursions, so malformed input degrades to silence
    /// instead of poisoning the accumulators. Always returns eight
    /// energies; never fails.
    pub fn analyze(&self, window: &Window<'_>) -> FrequencyEnergies {
        debug_assert_eq!(window.samples().len(), self.window_samples);

        let mut s1 = [0.0f64; BIN_COUNT];
        let mut s2 = [0.0f64; BIN_COUNT];

        for &sample in window.samples() {
            let x = if sample.is_finite() {
                sample as f64
            } else {
                0.0
            };
            for i in 0..BIN_COUNT {
                let s0 = x + self.coeffs[i] * s1[i] - s2[i];
                s2[i] = s1[i];
                s1[i] = s0;
            }
        }

        let mut energies = [0.0f64; BIN_COUNT];
        for i in 0..BIN_COUNT {
            // Magnitude squared of the bin, without the final complex rotate
            let mag_squared = s1[i] * s1[i] + s2[i] * s2[i] - self.coeffs[i] * s1[i] * s2[i];
            energies[i] = (mag_squared * self.norm).max(0.0);
        }

        FrequencyEnergies {
            low: [energies[0], energies[1], energies[2], energies[3]],
            high: [energies[4], energies[5], energies[6], energies[7]],
        }
    }

    /// Window length this analyzer was built for
    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    /// Sample rate this analyzer was built for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
