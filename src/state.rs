//! Debouncing tone state machine
//!
//! Folds the per-window classification stream into discrete tone events.
//! Two-threshold hysteresis: a tone must hold for `min_on_windows`
//! consecutive windows before it is considered pressed, and survives up to
//! `max_gap_windows` contradicting windows before it is considered
//! released. Emission is deferred to release, so every keypress yields
//! exactly one immutable [`DetectedTone`].
//!
//! The machine is strictly sequential: windows must be pushed in time
//! order, and events come out in non-decreasing start order.

use std::time::Duration;

use tracing::{debug, trace};

use crate::classifier::WindowClassification;
use crate::config::DetectorConfig;
use crate::tone::{DetectedTone, DtmfTone};

/// Internal detector state, driven solely by the classification stream.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DetectorState {
    /// No tone in sight
    Idle,
    /// A candidate seen, not yet held long enough to count as a press
    Pending {
        tone: DtmfTone,
        start_sample: u64,
        windows: usize,
    },
    /// A confirmed press, accumulating duration
    Active {
        tone: DtmfTone,
        start_sample: u64,
        windows: usize,
    },
    /// A press that stopped classifying; waiting out the gap tolerance
    Releasing {
        tone: DtmfTone,
        start_sample: u64,
        windows: usize,
        gap_windows: usize,
    },
}

/// Folds window classifications into debounced [`DetectedTone`] events.
///
/// Create one instance per logical stream. [`push`](Self::push) consumes one
/// window classification at a time and returns an event when a press
/// finalizes; [`flush`](Self::flush) finalizes any press still open at end
/// of stream. [`reset`](Self::reset) discards all state for reuse.
#[derive(Debug)]
pub struct ToneStateMachine {
    sample_rate: u32,
    step_samples: usize,
    min_on_windows: usize,
    max_gap_windows: usize,
    state: DetectorState,
}

impl ToneStateMachine {
    /// Create a machine with the given configuration.
    pub fn new(sample_rate: u32, config: &DetectorConfig) -> Self {
        Self {
            sample_rate,
            step_samples: config.step_samples,
            min_on_windows: config.min_on_windows,
            max_gap_windows: config.max_gap_windows,
            state: DetectorState::Idle,
        }
    }

    /// Consume one window classification.
    ///
    /// `window_start_sample` is the offset of the classified window's first
    /// sample; windows must arrive in time order. Returns a finalized event
    /// when this window ends a press, `None` otherwise.
    pub fn push(
        &mut self,
        classification: WindowClassification,
        window_start_sample: u64,
    ) -> Option<DetectedTone> {
        use WindowClassification::{Candidate, NoTone};

        let (next, emitted) = match (self.state, classification) {
            (DetectorState::Idle, NoTone) => (DetectorState::Idle, None),
            (DetectorState::Idle, Candidate { tone, .. }) => {
                (self.pend(tone, window_start_sample), None)
            }

            (DetectorState::Pending { tone, start_sample, windows }, Candidate { tone: seen, .. })
                if seen == tone =>
            {
                (self.hold(tone, start_sample, windows + 1), None)
            }
            // A flickering candidate restarts the count; nothing is emitted
            (DetectorState::Pending { .. }, Candidate { tone, .. }) => {
                (self.pend(tone, window_start_sample), None)
            }
            (DetectorState::Pending { .. }, NoTone) => (DetectorState::Idle, None),

            (DetectorState::Active { tone, start_sample, windows }, Candidate { tone: seen, .. })
                if seen == tone =>
            {
                (
                    DetectorState::Active {
                        tone,
                        start_sample,
                        windows: windows + 1,
                    },
                    None,
                )
            }
            // Contradiction: with gap tolerance, hold the press open in
            // Releasing; with none, this window already ends it
            (DetectorState::Active { tone, start_sample, windows }, contradiction) => {
                if self.max_gap_windows == 0 {
                    let next = match contradiction {
                        Candidate { tone: seen, .. } => self.pend(seen, window_start_sample),
                        NoTone => DetectorState::Idle,
                    };
                    (next, Some(self.finalize(tone, start_sample, windows)))
                } else {
                    (
                        DetectorState::Releasing {
                            tone,
                            start_sample,
                            windows,
                            gap_windows: 1,
                        },
                        None,
                    )
                }
            }

            // Same tone resumed within tolerance: absorb the gap into the press
            (
                DetectorState::Releasing { tone, start_sample, windows, gap_windows },
                Candidate { tone: seen, .. },
            ) if seen == tone => (
                DetectorState::Active {
                    tone,
                    start_sample,
                    windows: windows + gap_windows + 1,
                },
                None,
            ),
            // A different valid tone ends the press and immediately seeds
            // the next one
            (
                DetectorState::Releasing { tone, start_sample, windows, .. },
                Candidate { tone: seen, .. },
            ) => (
                self.pend(seen, window_start_sample),
                Some(self.finalize(tone, start_sample, windows)),
            ),
            (DetectorState::Releasing { tone, start_sample, windows, gap_windows }, NoTone) => {
                if gap_windows + 1 > self.max_gap_windows {
                    (
                        DetectorState::Idle,
                        Some(self.finalize(tone, start_sample, windows)),
                    )
                } else {
                    (
                        DetectorState::Releasing {
                            tone,
                            start_sample,
                            windows,
                            gap_windows: gap_windows + 1,
                        },
                        None,
                    )
                }
            }
        };

        if next != self.state {
            trace!(?next, offset = window_start_sample, "state transition");
        }
        self.state = next;
        emitted
    }

    /// Finalize any press still open at end of stream.
    ///
    /// `Pending` state is discarded (the candidate never held long enough);
    /// `Active` and `Releasing` emit their press up to the last counted
    /// window. Leaves the machine `Idle`.
    pub fn flush(&mut self) -> Option<DetectedTone> {
        let emitted = match self.state {
            DetectorState::Active { tone, start_sample, windows }
            | DetectorState::Releasing { tone, start_sample, windows, .. } => {
                Some(self.finalize(tone, start_sample, windows))
            }
            DetectorState::Idle | DetectorState::Pending { .. } => None,
        };
        self.state = DetectorState::Idle;
        emitted
    }

    /// Discard all state, ready for a new stream.
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
    }

    /// Seed a new candidate, promoting straight to `Active` when a single
    /// window already satisfies the minimum press length.
    fn pend(&self, tone: DtmfTone, start_sample: u64) -> DetectorState {
        self.hold(tone, start_sample, 1)
    }

    fn hold(&self, tone: DtmfTone, start_sample: u64, windows: usize) -> DetectorState {
        if windows >= self.min_on_windows {
            DetectorState::Active {
                tone,
                start_sample,
                windows,
            }
        } else {
            DetectorState::Pending {
                tone,
                start_sample,
                windows,
            }
        }
    }

    fn finalize(&self, tone: DtmfTone, start_sample: u64, windows: usize) -> DetectedTone {
        let event = DetectedTone {
            tone,
            start: self.samples_to_duration(start_sample),
            duration: self.samples_to_duration((windows * self.step_samples) as u64),
        };
        debug!(tone = %event.tone, start_ms = event.start.as_secs_f64() * 1000.0,
               duration_ms = event.duration.as_secs_f64() * 1000.0, "tone finalized");
        event
    }

    fn samples_to_duration(&self, samples: u64) -> Duration {
        Duration::from_secs_f64(samples as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;
    const STEP: usize = 205;

    fn machine() -> ToneStateMachine {
        ToneStateMachine::new(RATE, &DetectorConfig::default())
    }

    fn candidate(tone: DtmfTone) -> WindowClassification {
        WindowClassification::Candidate { tone, score: 0.9 }
    }

    /// Push a sequence of classifications at consecutive window offsets,
    /// collecting everything emitted (including the flush).
    fn run(
        machine: &mut ToneStateMachine,
        stream: &[WindowClassification],
    ) -> Vec<DetectedTone> {
        let mut events = Vec::new();
        for (i, &classification) in stream.iter().enumerate() {
            events.extend(machine.push(classification, (i * STEP) as u64));
        }
        events.extend(machine.flush());
        events
    }

    #[test]
    fn test_sustained_tone_emits_once() {
        let five = candidate(DtmfTone::Five);
        let mut stream = vec![five; 8];
        stream.push(WindowClassification::NoTone);
        stream.push(WindowClassification::NoTone);
        stream.push(WindowClassification::NoTone);

        let events = run(&mut machine(), &stream);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tone, DtmfTone::Five);
        assert_eq!(events[0].start, Duration::ZERO);

        let expected = Duration::from_secs_f64(8.0 * STEP as f64 / RATE as f64);
        assert_eq!(events[0].duration, expected);
    }

    #[test]
    fn test_single_window_below_minimum_is_dropped() {
        let stream = [candidate(DtmfTone::Two), WindowClassification::NoTone];
        assert!(run(&mut machine(), &stream).is_empty());
    }

    #[test]
    fn test_flicker_never_emits() {
        let mut stream = Vec::new();
        for _ in 0..10 {
            stream.push(candidate(DtmfTone::Seven));
            stream.push(WindowClassification::NoTone);
        }
        assert!(run(&mut machine(), &stream).is_empty());
    }

    #[test]
    fn test_pending_restarts_on_different_tone() {
        // One window of '1' then sustained '2': only '2' is emitted, and
        // its start is the first '2' window
        let mut stream = vec![candidate(DtmfTone::One)];
        stream.extend(vec![candidate(DtmfTone::Two); 4]);

        let events = run(&mut machine(), &stream);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tone, DtmfTone::Two);
        assert_eq!(
            events[0].start,
            Duration::from_secs_f64(STEP as f64 / RATE as f64)
        );
    }

    #[test]
    fn test_gap_within_tolerance_is_absorbed() {
        // 3 on, 1 gap, 4 on: a single event spanning all 8 windows
        let five = candidate(DtmfTone::Five);
        let mut stream = vec![five; 3];
        stream.push(WindowClassification::NoTone);
        stream.extend(vec![five; 4]);

        let events = run(&mut machine(), &stream);
        assert_eq!(events.len(), 1);
        let expected = Duration::from_secs_f64(8.0 * STEP as f64 / RATE as f64);
        assert_eq!(events[0].duration, expected);
    }

    #[test]
    fn test_gap_beyond_tolerance_splits() {
        // max_gap_windows = 2, so a 3-window gap ends the press
        let nine = candidate(DtmfTone::Nine);
        let mut stream = vec![nine; 4];
        stream.extend(vec![WindowClassification::NoTone; 3]);
        stream.extend(vec![nine; 4]);

        let events = run(&mut machine(), &stream);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tone, DtmfTone::Nine);
        assert_eq!(events[1].tone, DtmfTone::Nine);
        assert!(events[1].start > events[0].start, "Events in time order");
    }

    #[test]
    fn test_zero_gap_tolerance_splits_on_single_dropout() {
        let config = DetectorConfig {
            max_gap_windows: 0,
            ..DetectorConfig::default()
        };
        let mut m = ToneStateMachine::new(RATE, &config);

        // 4 on, 1 gap, 4 on: with no tolerance the gap must split the run
        let five = candidate(DtmfTone::Five);
        let mut stream = vec![five; 4];
        stream.push(WindowClassification::NoTone);
        stream.extend(vec![five; 4]);

        let events = run(&mut m, &stream);
        assert_eq!(events.len(), 2, "Zero tolerance must not absorb a gap");

        let windows = |n: usize| Duration::from_secs_f64((n * STEP) as f64 / RATE as f64);
        assert_eq!(events[0].start, Duration::ZERO);
        assert_eq!(events[0].duration, windows(4));
        assert_eq!(events[1].start, windows(5));
        assert_eq!(events[1].duration, windows(4));
    }

    #[test]
    fn test_zero_gap_tolerance_hands_off_without_releasing() {
        let config = DetectorConfig {
            max_gap_windows: 0,
            ..DetectorConfig::default()
        };
        let mut m = ToneStateMachine::new(RATE, &config);

        // Sustained '1' straight into sustained '2': the first '2' window
        // both ends the old press and seeds the new one
        let mut stream = vec![candidate(DtmfTone::One); 4];
        stream.extend(vec![candidate(DtmfTone::Two); 4]);

        let events = run(&mut m, &stream);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tone, DtmfTone::One);
        assert_eq!(events[1].tone, DtmfTone::Two);

        let windows = |n: usize| Duration::from_secs_f64((n * STEP) as f64 / RATE as f64);
        assert_eq!(events[0].duration, windows(4));
        assert_eq!(events[1].start, windows(4), "No window lost to Releasing");
        assert_eq!(events[1].duration, windows(4));
    }

    #[test]
    fn test_different_tone_hands_off() {
        // Sustained '1' followed by sustained '2' with no silence between
        let mut stream = vec![candidate(DtmfTone::One); 4];
        stream.extend(vec![candidate(DtmfTone::Two); 4]);

        let events = run(&mut machine(), &stream);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tone, DtmfTone::One);
        assert_eq!(events[1].tone, DtmfTone::Two);
        assert!(events[1].start >= events[0].start + events[0].duration);
    }

    #[test]
    fn test_flush_emits_open_press() {
        let mut m = machine();
        let mut events = Vec::new();
        for i in 0..5 {
            events.extend(m.push(candidate(DtmfTone::Hash), (i * STEP) as u64));
        }
        assert!(events.is_empty(), "Nothing emitted while press is open");
        let event = m.flush().expect("Open press must flush");
        assert_eq!(event.tone, DtmfTone::Hash);
    }

    #[test]
    fn test_flush_discards_pending() {
        let mut m = machine();
        assert!(m.push(candidate(DtmfTone::Three), 0).is_none());
        assert!(m.flush().is_none(), "Unconfirmed candidate is discarded");
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut m = machine();
        for i in 0..5 {
            m.push(candidate(DtmfTone::Six), (i * STEP) as u64);
        }
        m.reset();
        assert!(m.flush().is_none());
    }

    #[test]
    fn test_min_on_windows_of_one_activates_immediately() {
        let config = DetectorConfig {
            min_on_windows: 1,
            ..DetectorConfig::default()
        };
        let mut m = ToneStateMachine::new(RATE, &config);
        m.push(candidate(DtmfTone::Zero), 0);
        let event = m.flush().expect("Single window should confirm");
        assert_eq!(event.tone, DtmfTone::Zero);
    }

    #[test]
    fn test_empty_stream_is_silent() {
        assert!(run(&mut machine(), &[]).is_empty());
    }
}
