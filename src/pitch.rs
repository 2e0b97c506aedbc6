//! # Pitch Model
//!
//! Canonical note representation shared by the MIDI importer and the hand resolver.
//!
//! ## Pitch Numbering
//! A [`Pitch`] is a semitone index anchored at octave 0: `index = octave * 12 + offset`,
//! with `C = 0 ... B = 11`. Middle C (`C4`) is therefore 48.
//!
//! MIDI key numbers are one octave higher: MIDI 60 is `C4`, so a key `k` maps to
//! pitch `k - 12` and its name uses octave `floor(k / 12) - 1`.
//!
//! ## Note Names
//! ```text
//! [^v]*  [A-G]  s?  [0-9]*
//!  |      |     |     └─ explicit octave (defaults to 4, shifted by the prefixes)
//!  |      |     └─ sharp
//!  |      └─ letter
//!  └─ each ^ raises, each v lowers the default octave by one
//! ```
//!
//! Octaves outside `0..=9` are rejected, whether written or reached through prefixes.
//!
//! ## Hand Span
//! Ergonomic limits are measured in white keys, not semitones:
//! [`white_key_distance`] counts the white keys in `(p1, p2]`.

use crate::error::PianolaError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Default octave for names without an explicit octave.
const REFERENCE_OCTAVE: i16 = 4;

/// Highest octave a note name may use (`G9` is MIDI 127).
pub const MAX_OCTAVE: i16 = 9;

/// Note letters C through B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }

    /// Semitone offset from C
    pub fn semitone(self) -> i16 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

/// Spelling for each pitch class (sharps only)
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "Cs", "D", "Ds", "E", "F", "Fs", "G", "Gs", "A", "As", "B",
];

/// Semitone index, `C0 = 0`, `C4 = 48`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pitch(pub i16);

impl Pitch {
    pub const MIDDLE_C: Pitch = Pitch(48);

    /// Pitch of a MIDI key number (MIDI 60 = C4).
    pub fn from_midi_key(key: u8) -> Self {
        Pitch(key as i16 - 12)
    }

    /// MIDI key number for this pitch, if it lies in 0..=127.
    pub fn to_midi_key(self) -> Option<u8> {
        u8::try_from(i32::from(self.0) + 12).ok().filter(|k| *k <= 127)
    }

    pub fn octave(self) -> i16 {
        self.0.div_euclid(12)
    }

    pub fn pitch_class(self) -> usize {
        self.0.rem_euclid(12) as usize
    }

    pub fn is_white_key(self) -> bool {
        is_white_key(self)
    }

    pub fn name(self) -> String {
        pitch_to_name(self)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pitch_to_name(*self))
    }
}

/// Parse a note name into a pitch.
///
/// # Examples
/// ```
/// use pianola::pitch::{name_to_pitch, Pitch};
///
/// assert_eq!(name_to_pitch("C4").unwrap(), Pitch(48));
/// assert_eq!(name_to_pitch("Fs3").unwrap(), Pitch(42));
/// assert_eq!(name_to_pitch("^C").unwrap(), Pitch(60)); // C5
/// assert_eq!(name_to_pitch("vvA").unwrap(), Pitch(33)); // A2
/// assert!(name_to_pitch("H2").is_err());
/// ```
pub fn name_to_pitch(name: &str) -> Result<Pitch, PianolaError> {
    let invalid = || PianolaError::InvalidNoteSyntax(name.to_string());
    let mut chars = name.trim().chars().peekable();

    let mut shift: i16 = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '^' => shift = shift.saturating_add(1),
            'v' => shift = shift.saturating_sub(1),
            _ => break,
        }
        chars.next();
    }

    let letter = chars.next().and_then(NoteName::from_char).ok_or_else(invalid)?;
    let sharp = if chars.peek() == Some(&'s') {
        chars.next();
        1
    } else {
        0
    };

    let digits: String = chars.collect();
    let octave = if digits.is_empty() {
        REFERENCE_OCTAVE.saturating_add(shift)
    } else if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse::<i16>().map_err(|_| invalid())?
    } else {
        return Err(invalid());
    };
    if !(0..=MAX_OCTAVE).contains(&octave) {
        return Err(invalid());
    }

    Ok(Pitch(octave * 12 + letter.semitone() + sharp))
}

/// Canonical name of a pitch: `<Letter><s?><octave>`.
///
/// ```
/// use pianola::pitch::{pitch_to_name, Pitch};
///
/// assert_eq!(pitch_to_name(Pitch(48)), "C4");
/// assert_eq!(pitch_to_name(Pitch(61)), "Cs5");
/// ```
pub fn pitch_to_name(pitch: Pitch) -> String {
    format!("{}{}", PITCH_CLASS_NAMES[pitch.pitch_class()], pitch.octave())
}

/// Name of a MIDI key number (MIDI 60 = "C4").
pub fn midi_key_name(key: u8) -> String {
    let octave = (key / 12) as i16 - 1;
    format!("{}{}", PITCH_CLASS_NAMES[(key % 12) as usize], octave)
}

pub fn is_white_key(pitch: Pitch) -> bool {
    is_white_index(i32::from(pitch.0))
}

fn is_white_index(index: i32) -> bool {
    matches!(index.rem_euclid(12), 0 | 2 | 4 | 5 | 7 | 9 | 11)
}

/// Number of white keys in `(p1, p2]`; zero when `p2 <= p1`.
///
/// ```
/// use pianola::pitch::{white_key_distance, Pitch};
///
/// // C3 -> C4 crosses D E F G A B C
/// assert_eq!(white_key_distance(Pitch(36), Pitch(48)), 7);
/// assert_eq!(white_key_distance(Pitch(48), Pitch(48)), 0);
/// ```
pub fn white_key_distance(p1: Pitch, p2: Pitch) -> u32 {
    let (start, end) = (i32::from(p1.0) + 1, i32::from(p2.0));
    (start..=end).filter(|p| is_white_index(*p)).count() as u32
}

/// A parsed note: canonical name plus pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub name: String,
    pub pitch: Pitch,
}

impl Note {
    pub fn parse(token: &str) -> Result<Self, PianolaError> {
        let pitch = name_to_pitch(token)?;
        Ok(Self {
            name: pitch_to_name(pitch),
            pitch,
        })
    }
}

impl FromStr for Note {
    type Err = PianolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

/// Parse every `+`-separated token in `chord`, dropping empty and invalid tokens.
pub fn parse_chord(chord: &str) -> Vec<Note> {
    chord
        .split('+')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| Note::parse(token).ok())
        .collect()
}

/// Mean pitch of a set of notes, `None` when empty.
pub fn average_pitch(notes: &[Note]) -> Option<f64> {
    if notes.is_empty() {
        return None;
    }
    let sum: f64 = notes.iter().map(|n| n.pitch.0 as f64).sum();
    Some(sum / notes.len() as f64)
}
