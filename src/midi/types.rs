//! MIDI import type definitions

use crate::pitch::midi_key_name;
use serde::Serialize;

/// Note event direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    On,
    Off,
}

/// A note-on or note-off at an absolute tick
///
/// Note-on with velocity 0 is reported as `Off`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub time_ticks: u64,
    pub key: u8,
    pub kind: EventKind,
    pub track: usize,
}

/// A sounding note: a note-on paired with its note-off
///
/// # Fields
/// - `start_ticks`: absolute tick of the note-on
/// - `duration_ticks`: always greater than zero
/// - `key`: MIDI key number (60 = C4)
/// - `track`: index of the track chunk the note came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSpan {
    pub start_ticks: u64,
    pub duration_ticks: u64,
    pub key: u8,
    pub track: usize,
}

impl NoteSpan {
    pub fn end_ticks(&self) -> u64 {
        self.start_ticks + self.duration_ticks
    }

    pub fn name(&self) -> String {
        midi_key_name(self.key)
    }
}

/// Header fields shared by raw and paired decode results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MidiHeader {
    pub format: u16,
    pub track_count: u16,
    pub ticks_per_quarter: u16,
}

/// Raw per-track note events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiEvents {
    pub header: MidiHeader,
    pub tracks: Vec<Vec<RawEvent>>,
}

/// Decoded MIDI file: per-track note spans
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MidiFile {
    pub format: u16,
    pub ticks_per_quarter: u16,
    pub tracks: Vec<Vec<NoteSpan>>,
}
