//! Conversion between voice notation text and [`Segment`]s.

use super::lexer::{Lexer, Token, DELAY_SYMBOL, SEPARATOR};
use serde::{Deserialize, Serialize};

/// One chord (possibly empty) followed by its delay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// `+`-joined note names, empty for a rest
    pub notes: String,
    /// Number of delay symbols after the chord
    pub delay: usize,
}

impl Segment {
    pub fn new(notes: impl Into<String>, delay: usize) -> Self {
        Self {
            notes: notes.into(),
            delay,
        }
    }

    pub fn rest(delay: usize) -> Self {
        Self::new(String::new(), delay)
    }

    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }

    /// The delay as notation text (`"___"` for 3)
    pub fn delay_text(&self) -> String {
        DELAY_SYMBOL.to_string().repeat(self.delay)
    }
}

/// Parse voice text into segments.
///
/// Text without any letter carries no notes and normalizes to an empty voice.
///
/// # Example
/// ```
/// use pianola::notation::{parse_voice, Segment};
///
/// let segments = parse_voice("__C4+E4___G4_");
/// assert_eq!(
///     segments,
///     vec![Segment::rest(2), Segment::new("C4+E4", 3), Segment::new("G4", 1)]
/// );
/// ```
pub fn parse_voice(text: &str) -> Vec<Segment> {
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return Vec::new();
    }

    let tokens = Lexer::new(text).tokenize();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].token {
            Token::Notes(text) => {
                // Fold a following delay run into the same segment
                let delay = match tokens.get(i + 1).map(|t| &t.token) {
                    Some(Token::Delay(len)) => {
                        i += 1;
                        *len
                    }
                    _ => 0,
                };
                segments.push(Segment::new(text.trim(), delay));
            }
            Token::Delay(len) => segments.push(Segment::rest(*len)),
            Token::Separator => {}
        }
        i += 1;
    }

    segments
}

/// Format segments back into voice text.
///
/// A chord with no delay that is followed by another segment is closed with `,`
/// so the two do not run together.
///
/// ```
/// use pianola::notation::{format_voice, Segment};
///
/// let text = format_voice(&[Segment::new("C4", 0), Segment::new("D4", 2)]);
/// assert_eq!(text, "C4,D4__");
/// ```
pub fn format_voice(segments: &[Segment]) -> String {
    // Empty rests produce no text and must not leave a dangling separator
    let visible: Vec<&Segment> = segments
        .iter()
        .filter(|s| !(s.is_rest() && s.delay == 0))
        .collect();

    let mut out = String::new();
    for (i, segment) in visible.iter().enumerate() {
        out.push_str(&segment.notes);
        out.push_str(&segment.delay_text());
        if segment.delay == 0 && i + 1 < visible.len() {
            out.push(SEPARATOR);
        }
    }
    out
}

/// Pad the shorter voice with empty segments so both have the same length.
pub fn align(left: &[Segment], right: &[Segment]) -> (Vec<Segment>, Vec<Segment>) {
    let len = left.len().max(right.len());
    let pad = |voice: &[Segment]| {
        let mut padded = voice.to_vec();
        padded.resize(len, Segment::default());
        padded
    };
    (pad(left), pad(right))
}
