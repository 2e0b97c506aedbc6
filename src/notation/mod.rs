//! # Notation Module
//!
//! The compact chord-and-duration text notation shared by the MIDI importer, the
//! hand resolver and the playback schedule.
//!
//! ## Syntax
//! ```text
//! __  C3+G3__________  E4_____
//! |   |                └─ chord E4, held for 5 units
//! |   └─ chord C3+G3, held for 10 units
//! └─ leading rest of 2 units
//! ```
//! (spaces added for readability; the voice text is `__C3+G3__________E4_____`)
//! - note names: `[A-G]s?<octave>` (see [`crate::pitch`])
//! - `+` joins simultaneous notes
//! - each `_` is one time unit (a tenth of a quarter note at the default resolution)
//! - `,` separates two chords that have no delay between them
//!
//! ## Sub-modules
//! - `lexer` - splits text into notes text, delay runs and separators
//! - `codec` - [`parse_voice`] / [`format_voice`] and [`Segment`]
//! - `normalize` - forgiving front end for hand-typed input

mod codec;
mod lexer;
mod normalize;

pub use codec::{align, format_voice, parse_voice, Segment};
pub use lexer::{Lexer, LocatedToken, Token, DELAY_SYMBOL, SEPARATOR};
pub use normalize::{normalize_segments, normalize_voice};

use serde::{Deserialize, Serialize};

/// Which hand plays a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

/// The two voice strings of a piece
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePair {
    pub left: String,
    pub right: String,
}

impl VoicePair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn voice(&self, hand: Hand) -> &str {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }
}
