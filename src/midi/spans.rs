//! Pairing note-on/note-off events into [`NoteSpan`]s

use super::types::{EventKind, NoteSpan, RawEvent};

/// Pair each note-on with the next note-off of the same key.
///
/// One note per key is active at a time: a second note-on for a sounding key is
/// ignored until the first is closed. Zero-length notes and note-ons that are
/// never closed are dropped. Spans are returned in the order they close.
pub fn pair_spans(events: &[RawEvent]) -> Vec<NoteSpan> {
    let mut active: [Option<u64>; 128] = [None; 128];
    let mut spans = Vec::new();

    for event in events {
        let slot = &mut active[(event.key & 0x7F) as usize];
        match event.kind {
            EventKind::On => {
                if slot.is_none() {
                    *slot = Some(event.time_ticks);
                }
            }
            EventKind::Off => {
                if let Some(start) = slot.take() {
                    let duration = event.time_ticks.saturating_sub(start);
                    if duration > 0 {
                        spans.push(NoteSpan {
                            start_ticks: start,
                            duration_ticks: duration,
                            key: event.key,
                            track: event.track,
                        });
                    }
                }
            }
        }
    }

    let dangling = active.iter().filter(|slot| slot.is_some()).count();
    if dangling > 0 {
        log::debug!("dropping {} note(s) with no note-off", dangling);
    }

    spans
}
