//! DTMF tone symbols and detected-tone events
//!
//! A DTMF symbol is the combination of one low-group and one high-group
//! sine frequency. The 4x4 grid of (low, high) pairs covers the 16 keypad
//! symbols; no two symbols share a pair.

use std::fmt;
use std::time::Duration;

/// The four low-group DTMF frequencies in Hz (keypad rows).
pub const LOW_FREQUENCIES: [f32; 4] = [697.0, 770.0, 852.0, 941.0];

/// The four high-group DTMF frequencies in Hz (keypad columns).
pub const HIGH_FREQUENCIES: [f32; 4] = [1209.0, 1336.0, 1477.0, 1633.0];

/// One of the 16 DTMF keypad symbols.
///
/// Each symbol maps to a unique (low, high) frequency pair from the
/// standard 4x4 grid.
///
/// # Example
/// ```
/// use dtmf_detector::DtmfTone;
///
/// assert_eq!(DtmfTone::Five.low_frequency(), 770.0);
/// assert_eq!(DtmfTone::Five.high_frequency(), 1336.0);
/// assert_eq!(DtmfTone::Five.as_char(), '5');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtmfTone {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    A,
    B,
    C,
    D,
    Star,
    Hash,
}

/// Keypad layout: rows are low-group frequencies, columns are high-group.
const GRID: [[DtmfTone; 4]; 4] = [
    [DtmfTone::One, DtmfTone::Two, DtmfTone::Three, DtmfTone::A],
    [DtmfTone::Four, DtmfTone::Five, DtmfTone::Six, DtmfTone::B],
    [DtmfTone::Seven, DtmfTone::Eight, DtmfTone::Nine, DtmfTone::C],
    [DtmfTone::Star, DtmfTone::Zero, DtmfTone::Hash, DtmfTone::D],
];

impl DtmfTone {
    /// All 16 symbols in keypad order.
    pub const ALL: [DtmfTone; 16] = [
        DtmfTone::One,
        DtmfTone::Two,
        DtmfTone::Three,
        DtmfTone::A,
        DtmfTone::Four,
        DtmfTone::Five,
        DtmfTone::Six,
        DtmfTone::B,
        DtmfTone::Seven,
        DtmfTone::Eight,
        DtmfTone::Nine,
        DtmfTone::C,
        DtmfTone::Star,
        DtmfTone::Zero,
        DtmfTone::Hash,
        DtmfTone::D,
    ];

    /// Grid position as (low-group row, high-group column).
    fn grid_position(self) -> (usize, usize) {
        match self {
            DtmfTone::One => (0, 0),
            DtmfTone::Two => (0, 1),
            DtmfTone::Three => (0, 2),
            DtmfTone::A => (0, 3),
            DtmfTone::Four => (1, 0),
            DtmfTone::Five => (1, 1),
            DtmfTone::Six => (1, 2),
            DtmfTone::B => (1, 3),
            DtmfTone::Seven => (2, 0),
            DtmfTone::Eight => (2, 1),
            DtmfTone::Nine => (2, 2),
            DtmfTone::C => (2, 3),
            DtmfTone::Star => (3, 0),
            DtmfTone::Zero => (3, 1),
            DtmfTone::Hash => (3, 2),
            DtmfTone::D => (3, 3),
        }
    }

    /// Low-group frequency of this symbol in Hz.
    pub fn low_frequency(self) -> f32 {
        LOW_FREQUENCIES[self.grid_position().0]
    }

    /// High-group frequency of this symbol in Hz.
    pub fn high_frequency(self) -> f32 {
        HIGH_FREQUENCIES[self.grid_position().1]
    }

    /// Look up the symbol at a grid position.
    ///
    /// `low_index` selects the low-group frequency (0..4, keypad row) and
    /// `high_index` the high-group frequency (0..4, keypad column).
    /// Returns `None` when either index is out of range.
    pub fn from_frequency_pair(low_index: usize, high_index: usize) -> Option<Self> {
        GRID.get(low_index)?.get(high_index).copied()
    }

    /// The keypad character for this symbol.
    pub fn as_char(self) -> char {
        match self {
            DtmfTone::Zero => '0',
            DtmfTone::One => '1',
            DtmfTone::Two => '2',
            DtmfTone::Three => '3',
            DtmfTone::Four => '4',
            DtmfTone::Five => '5',
            DtmfTone::Six => '6',
            DtmfTone::Seven => '7',
            DtmfTone::Eight => '8',
            DtmfTone::Nine => '9',
            DtmfTone::A => 'A',
            DtmfTone::B => 'B',
            DtmfTone::C => 'C',
            DtmfTone::D => 'D',
            DtmfTone::Star => '*',
            DtmfTone::Hash => '#',
        }
    }

    /// Parse a keypad character (case-insensitive for A-D).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(DtmfTone::Zero),
            '1' => Some(DtmfTone::One),
            '2' => Some(DtmfTone::Two),
            '3' => Some(DtmfTone::Three),
            '4' => Some(DtmfTone::Four),
            '5' => Some(DtmfTone::Five),
            '6' => Some(DtmfTone::Six),
            '7' => Some(DtmfTone::Seven),
            '8' => Some(DtmfTone::Eight),
            '9' => Some(DtmfTone::Nine),
            'A' | 'a' => Some(DtmfTone::A),
            'B' | 'b' => Some(DtmfTone::B),
            'C' | 'c' => Some(DtmfTone::C),
            'D' | 'd' => Some(DtmfTone::D),
            '*' => Some(DtmfTone::Star),
            '#' => Some(DtmfTone::Hash),
            _ => None,
        }
    }
}

impl fmt::Display for DtmfTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A detected tone event: which key was pressed, when, and for how long.
///
/// Offsets are relative to the start of the scanned sample stream.
/// Immutable once emitted by the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedTone {
    /// The detected keypad symbol
    pub tone: DtmfTone,
    /// Offset of the tone start from the beginning of the stream
    pub start: Duration,
    /// How long the tone was held
    pub duration: Duration,
}

impl fmt::Display for DetectedTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.1}ms for {:.1}ms",
            self.tone,
            self.start.as_secs_f64() * 1000.0,
            self.duration.as_secs_f64() * 1000.0
        )
    }
}
