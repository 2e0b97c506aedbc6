//! # Playback Schedule
//!
//! Flattens the two voice strings into one timed list of notes for a playback
//! driver (audio, falling-note animation, keyboard highlighting).
//!
//! ## Timing
//! Both voices start at 0 ms and are walked independently:
//! - a chord followed by `n` delay symbols lasts `n * unit_ms`
//! - a chord with no delay lasts `bare_chord_ms`
//! - a rest only advances the clock
//!
//! Every note of a chord starts together and lasts as long as the chord.
//!
//! ## Example
//! ```rust
//! use pianola::config::ScheduleConfig;
//! use pianola::notation::{Hand, VoicePair};
//! use pianola::schedule::schedule_voices;
//!
//! let pair = VoicePair::new("C3____", "__E4+G4__");
//! let notes = schedule_voices(&pair, &ScheduleConfig::default());
//!
//! assert_eq!(notes.len(), 3);
//! assert_eq!((notes[0].name.as_str(), notes[0].hand, notes[0].start_ms), ("C3", Hand::Left, 0));
//! assert_eq!(notes[0].duration_ms, 300);
//! assert_eq!(notes[1].start_ms, 150);
//! assert_eq!(notes[1].midi_key, 64);
//! ```

use serde::Serialize;

use crate::config::ScheduleConfig;
use crate::notation::{parse_voice, Hand, VoicePair};
use crate::pitch::parse_chord;

/// One note of the playback schedule
///
/// # Fields
/// - `name`: canonical note name (`Cs4`)
/// - `midi_key`: MIDI key number for audio (C4 = 60)
/// - `hand`: voice the note came from
/// - `start_ms`: offset from the start of the piece
/// - `duration_ms`: how long the note's chord lasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNote {
    pub name: String,
    pub midi_key: u8,
    pub hand: Hand,
    pub start_ms: u64,
    pub duration_ms: u64,
}

/// Time a segment occupies before the next one starts
fn advance_ms(delay: usize, has_notes: bool, config: &ScheduleConfig) -> u64 {
    if delay > 0 {
        delay as u64 * config.unit_ms as u64
    } else if has_notes {
        config.bare_chord_ms as u64
    } else {
        0
    }
}

fn schedule_voice(text: &str, hand: Hand, config: &ScheduleConfig, out: &mut Vec<ScheduledNote>) {
    let mut offset: u64 = 0;

    for segment in parse_voice(text) {
        let advance = advance_ms(segment.delay, !segment.is_rest(), config);
        for note in parse_chord(&segment.notes) {
            let Some(midi_key) = note.pitch.to_midi_key() else {
                log::trace!("skipping {}: outside the MIDI key range", note.name);
                continue;
            };
            out.push(ScheduledNote {
                name: note.name,
                midi_key,
                hand,
                start_ms: offset,
                duration_ms: advance,
            });
        }
        offset += advance;
    }
}

/// Schedule both voices, ordered by start time.
///
/// Notes starting together keep voice order (left before right), then chord order.
pub fn schedule_voices(pair: &VoicePair, config: &ScheduleConfig) -> Vec<ScheduledNote> {
    let mut notes = Vec::new();
    schedule_voice(&pair.left, Hand::Left, config, &mut notes);
    schedule_voice(&pair.right, Hand::Right, config, &mut notes);
    notes.sort_by_key(|n| n.start_ms);

    log::debug!(
        "scheduled {} note(s) over {} ms",
        notes.len(),
        total_duration_ms(&notes)
    );

    notes
}

/// End time of the last note to finish
pub fn total_duration_ms(notes: &[ScheduledNote]) -> u64 {
    notes.iter().map(|n| n.start_ms + n.duration_ms).max().unwrap_or(0)
}
