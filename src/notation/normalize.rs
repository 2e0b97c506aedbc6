//! Input normalization front end.
//!
//! Hand-typed voices are forgiving: lowercase letters, `#` for sharps, spaces as
//! delays, `,` between entries and octave-less names with `^`/`v` prefixes are all
//! accepted. Normalization rewrites them into canonical notation the rest of the
//! pipeline understands (`c e# ^g  a` becomes `C4_F4_G5__A4`).
//!
//! Notes written one after another without `+` are separate entries, not a chord.

use super::codec::{format_voice, Segment};
use crate::pitch::Note;

/// A note being read: prefixes, letter, sharp, octave digits
#[derive(Debug, Default)]
struct PendingNote {
    shift: i16,
    letter: Option<char>,
    sharp: bool,
    octave: String,
}

impl PendingNote {
    fn is_empty(&self) -> bool {
        self.shift == 0 && self.letter.is_none()
    }

    /// Spell as a note name `Note::parse` understands
    fn spelling(&self) -> Option<String> {
        let letter = self.letter?;
        let prefix = if self.shift >= 0 {
            "^".repeat(self.shift as usize)
        } else {
            "v".repeat(self.shift.unsigned_abs() as usize)
        };
        let sharp = if self.sharp { "s" } else { "" };
        Some(format!("{}{}{}{}", prefix, letter, sharp, self.octave))
    }
}

#[derive(Debug, Default)]
struct Normalizer {
    segments: Vec<Segment>,
    chord: Vec<String>,
    note: PendingNote,
    delay: usize,
    /// A `+` was read since the last finished note
    joined: bool,
}

impl Normalizer {
    fn finish_note(&mut self) {
        let note = std::mem::take(&mut self.note);
        if let Some(spelling) = note.spelling() {
            match Note::parse(&spelling) {
                Ok(parsed) => self.chord.push(parsed.name),
                Err(e) => log::trace!("dropping note while normalizing: {}", e),
            }
        }
    }

    fn flush_entry(&mut self) {
        if !self.chord.is_empty() || self.delay > 0 {
            let notes = self.chord.join("+");
            self.segments.push(Segment::new(notes, self.delay));
        }
        self.chord.clear();
        self.delay = 0;
        self.joined = false;
    }

    /// Called before a fresh note begins; closes the entry unless joined by `+`
    fn start_note(&mut self) {
        if !self.joined && (!self.chord.is_empty() || self.delay > 0) {
            self.flush_entry();
        }
        self.joined = false;
    }

    fn push(&mut self, c: char) {
        match c {
            '+' => {
                self.finish_note();
                if self.delay == 0 {
                    self.joined = true;
                }
            }
            '^' | 'v' | 'V' => {
                if self.note.letter.is_some() {
                    self.finish_note();
                }
                if self.note.is_empty() {
                    self.start_note();
                }
                self.note.shift = self.note.shift.saturating_add(if c == '^' { 1 } else { -1 });
            }
            'a'..='g' | 'A'..='G' => {
                if self.note.letter.is_some() {
                    self.finish_note();
                }
                if self.note.is_empty() {
                    self.start_note();
                }
                self.note.letter = Some(c.to_ascii_uppercase());
            }
            's' | 'S' | '#' => {
                if self.note.letter.is_some() && !self.note.sharp && self.note.octave.is_empty() {
                    self.note.sharp = true;
                }
            }
            '0'..='9' => {
                if self.note.letter.is_some() {
                    self.note.octave.push(c);
                }
            }
            '_' | ' ' => {
                self.finish_note();
                self.delay += 1;
                self.joined = false;
            }
            ',' => {
                self.finish_note();
                self.flush_entry();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.finish_note();
        self.flush_entry();
        self.segments
    }
}

/// Normalize hand-typed input into canonical segments.
pub fn normalize_segments(raw: &str) -> Vec<Segment> {
    let mut normalizer = Normalizer::default();
    for c in raw.chars() {
        normalizer.push(c);
    }
    normalizer.finish()
}

/// Normalize hand-typed input into canonical voice text.
///
/// ```
/// use pianola::notation::normalize_voice;
///
/// assert_eq!(normalize_voice("c+e+g  vA"), "C4+E4+G4__A3");
/// assert_eq!(normalize_voice("Fs3_,g#2__"), "Fs3_Gs2__");
/// ```
pub fn normalize_voice(raw: &str) -> String {
    format_voice(&normalize_segments(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octaves_default_to_four() {
        assert_eq!(normalize_voice("C_D_E_"), "C4_D4_E4_");
    }

    #[test]
    fn test_prefix_shifts() {
        assert_eq!(normalize_voice("^C_vvB_^^d"), "C5_B2_D6");
    }

    #[test]
    fn test_explicit_octave_is_kept() {
        assert_eq!(normalize_voice("a1+cs2___"), "A1+Cs2___");
    }

    #[test]
    fn test_adjacent_notes_are_separate_entries() {
        let segments = normalize_segments("CDE_");
        assert_eq!(
            segments,
            vec![
                Segment::new("C4", 0),
                Segment::new("D4", 0),
                Segment::new("E4", 1),
            ]
        );
        assert_eq!(normalize_voice("CDE_"), "C4,D4,E4_");
    }

    #[test]
    fn test_leading_rest_and_spaces() {
        assert_eq!(normalize_voice("  c4 "), "__C4_");
    }

    #[test]
    fn test_garbage_is_discarded() {
        assert_eq!(normalize_voice("C4|__!E4?__"), "C4__E4__");
        assert_eq!(normalize_voice("xyz"), "");
    }

    #[test]
    fn test_commas_separate_entries() {
        assert_eq!(
            normalize_segments("C4,E4,,G4__"),
            vec![
                Segment::new("C4", 0),
                Segment::new("E4", 0),
                Segment::new("G4", 2),
            ]
        );
    }

    #[test]
    fn test_plus_after_delay_starts_new_entry() {
        assert_eq!(
            normalize_segments("C4_+E4_"),
            vec![Segment::new("C4", 1), Segment::new("E4", 1)]
        );
    }

    #[test]
    fn test_output_is_canonical() {
        // Normalizing canonical text leaves it unchanged
        let canonical = "__C3+G3__________E4_____";
        assert_eq!(normalize_voice(canonical), canonical);
    }
}
