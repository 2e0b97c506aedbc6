//! # MIDI Module
//!
//! Imports Standard MIDI Files: decodes the binary chunks and pairs note events
//! into timed [`NoteSpan`]s for the timeline quantizer.
//!
//! ## Sub-modules
//! - `reader` - bounds-checked byte reader, variable-length quantities
//! - `decoder` - header/track chunks and the per-track event state machine
//! - `spans` - note-on/note-off pairing
//! - `types` - [`RawEvent`], [`NoteSpan`], [`MidiFile`]
//!
//! ## What Is Kept
//! Only note-on and note-off events survive decoding. Meta events, sysex,
//! program changes, controllers and pitch bend are skipped by length without being
//! interpreted; tempo maps and channels are ignored.
//!
//! ## Failure Modes
//! Decoding is all-or-nothing:
//! - missing `MThd`/`MTrk` tags, truncated chunks, events running past their
//!   track chunk, data bytes with no running status → `MalformedMidi`
//! - SMPTE time division → `UnsupportedDivision`
//!
//! ## Example
//! ```rust
//! use pianola::midi::decode;
//!
//! let parts: [&[u8]; 7] = [
//!     b"MThd", &[0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0],
//!     b"MTrk", &[0, 0, 0, 13],
//!     &[0x00, 0x90, 60, 100],        // note on C4
//!     &[0x83, 0x60, 0x80, 60, 64],   // 480 ticks later, note off
//!     &[0x00, 0xFF, 0x2F, 0x00],     // end of track
//! ];
//! let bytes = parts.concat();
//!
//! let file = decode(&bytes).unwrap();
//! assert_eq!(file.ticks_per_quarter, 480);
//! assert_eq!(file.tracks[0][0].duration_ticks, 480);
//! ```

mod decoder;
mod reader;
mod spans;
mod types;


pub use decoder::decode_events;
pub use spans::pair_spans;
pub use types::{EventKind, MidiEvents, MidiFile, MidiHeader, NoteSpan, RawEvent};

use crate::error::PianolaError;

/// Decode a MIDI buffer into per-track note spans.
pub fn decode(bytes: &[u8]) -> Result<MidiFile, PianolaError> {
    let events = decode_events(bytes)?;
    let tracks: Vec<Vec<NoteSpan>> = events.tracks.iter().map(|t| pair_spans(t)).collect();

    log::debug!(
        "decoded MIDI format {} with {} track(s) at {} ticks per quarter",
        events.header.format,
        tracks.len(),
        events.header.ticks_per_quarter
    );

    Ok(MidiFile {
        format: events.header.format,
        ticks_per_quarter: events.header.ticks_per_quarter,
        tracks,
    })
}
