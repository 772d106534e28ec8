//! Sliding-window traversal of a sample stream
//!
//! [`WindowScanner`] slices a sample slice into fixed-length, possibly
//! overlapping windows on demand. It is forward-only and consumed once;
//! scanning the same stream again means constructing a fresh scanner.

use std::borrow::Cow;

use crate::config::TailPolicy;

/// One fixed-length slice of the input stream, tagged with its start offset.
///
/// Full windows borrow from the input; only a zero-padded tail under
/// [`TailPolicy::Pad`] owns its samples.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    samples: Cow<'a, [f32]>,
    start_sample: u64,
}

impl<'a> Window<'a> {
    /// Wrap a borrowed slice as a window starting at `start_sample`.
    pub fn borrowed(samples: &'a [f32], start_sample: u64) -> Self {
        Self {
            samples: Cow::Borrowed(samples),
            start_sample,
        }
    }

    /// The window's samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Offset of the first sample relative to the stream start
    pub fn start_sample(&self) -> u64 {
        self.start_sample
    }
}

/// Iterator producing fixed-length windows over a sample slice.
///
/// `step <= window` is required (validated by the detector config); a step
/// smaller than the window length yields overlapping windows.
#[derive(Debug)]
pub struct WindowScanner<'a> {
    samples: &'a [f32],
    window_samples: usize,
    step_samples: usize,
    tail_policy: TailPolicy,
    position: usize,
    tail_emitted: bool,
}

impl<'a> WindowScanner<'a> {
    /// Create a scanner over `samples`.
    pub fn new(
        samples: &'a [f32],
        window_samples: usize,
        step_samples: usize,
        tail_policy: TailPolicy,
    ) -> Self {
        Self {
            samples,
            window_samples: window_samples.max(1),
            step_samples: step_samples.max(1),
            tail_policy,
            position: 0,
            tail_emitted: false,
        }
    }
}

impl<'a> Iterator for WindowScanner<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Window<'a>> {
        let start = self.position;

        if start + self.window_samples <= self.samples.len() {
            self.position += self.step_samples;
            return Some(Window::borrowed(
                &self.samples[start..start + self.window_samples],
                start as u64,
            ));
        }

        // Short tail, if any
        if self.tail_emitted || start >= self.samples.len() {
            return None;
        }
        self.tail_emitted = true;

        match self.tail_policy {
            TailPolicy::Drop => None,
            TailPolicy::Pad => {
                let mut padded = self.samples[start..].to_vec();
                padded.resize(self.window_samples, 0.0);
                Some(Window {
                    samples: Cow::Owned(padded),
                    start_sample: start as u64,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_non_overlapping_windows() {
        let samples = ramp(30);
        let windows: Vec<_> = WindowScanner::new(&samples, 10, 10, TailPolicy::Drop).collect();

        assert_eq!(windows.len(), 3);
        for (i, window) in windows.iter().enumerate() {
            assert_eq!(window.start_sample(), (i * 10) as u64);
            assert_eq!(window.samples().len(), 10);
            assert_eq!(window.samples()[0], (i * 10) as f32);
        }
    }

    #[test]
    fn test_overlapping_windows() {
        let samples = ramp(20);
        let windows: Vec<_> = WindowScanner::new(&samples, 10, 5, TailPolicy::Drop).collect();

        // Starts at 0, 5, 10; start 15 has only 5 samples left
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[1].start_sample(), 5);
        assert_eq!(windows[2].start_sample(), 10);
    }

    #[test]
    fn test_short_input_drop_policy() {
        let samples = ramp(7);
        let mut scanner = WindowScanner::new(&samples, 10, 10, TailPolicy::Drop);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_short_tail_pad_policy() {
        let samples = ramp(25);
        let windows: Vec<_> = WindowScanner::new(&samples, 10, 10, TailPolicy::Pad).collect();

        assert_eq!(windows.len(), 3);
        let tail = &windows[2];
        assert_eq!(tail.start_sample(), 20);
        assert_eq!(tail.samples().len(), 10);
        assert_eq!(tail.samples()[4], 24.0);
        assert_eq!(tail.samples()[5], 0.0, "Padding must be silence");
    }

    #[test]
    fn test_exact_fit_has_no_tail() {
        let samples = ramp(20);
        let windows: Vec<_> = WindowScanner::new(&samples, 10, 10, TailPolicy::Pad).collect();
        assert_eq!(windows.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let windows: Vec<_> = WindowScanner::new(&[], 10, 10, TailPolicy::Pad).collect();
        assert!(windows.is_empty());
    }
}
