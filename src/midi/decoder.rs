//! Standard MIDI File decoder
//!
//! Reads the header chunk and every track chunk, keeping only note-on/note-off
//! events. The per-track event loop is an explicit state machine so each failure
//! point (truncated delta, missing status, short payload) is a distinct state.

use super::reader::ByteReader;
use super::types::{EventKind, MidiEvents, MidiHeader, RawEvent};
use crate::error::PianolaError;

/// Fixed part of the `MThd` chunk: format, track count, division
const HEADER_LEN: u32 = 6;

/// States of the track event loop
#[derive(Debug, Clone, Copy, PartialEq)]
enum DecodeState {
    /// Next bytes are a delta-time VLQ (or the chunk is finished)
    AwaitingDelta,
    /// Next byte is a status byte, or a data byte under running status
    AwaitingStatus,
    /// Status is known; next bytes are its payload
    AwaitingPayload(u8),
}

/// Decode a MIDI buffer into raw per-track note events.
pub fn decode_events(bytes: &[u8]) -> Result<MidiEvents, PianolaError> {
    let mut reader = ByteReader::new(bytes);
    let header = read_header(&mut reader)?;

    let mut tracks = Vec::with_capacity(header.track_count as usize);
    for track in 0..header.track_count as usize {
        reader.expect_tag(b"MTrk")?;
        let len = reader.read_u32()? as usize;
        let mut chunk = reader.take(len, "track chunk")?;
        let events = decode_track(&mut chunk, track)?;
        log::debug!("track {}: {} bytes, {} note events", track, len, events.len());
        tracks.push(events);
    }

    Ok(MidiEvents { header, tracks })
}

fn read_header(reader: &mut ByteReader) -> Result<MidiHeader, PianolaError> {
    reader.expect_tag(b"MThd")?;
    let len = reader.read_u32()?;
    if len < HEADER_LEN {
        return Err(reader.error(format!("header length {} is shorter than {}", len, HEADER_LEN)));
    }
    // Longer headers carry fields we do not use
    let mut header = reader.take(len as usize, "header chunk")?;

    let format = header.read_u16()?;
    let track_count = header.read_u16()?;
    let division_offset = header.position();
    let division = header.read_u16()?;

    if division & 0x8000 != 0 {
        return Err(PianolaError::UnsupportedDivision(division));
    }
    if division == 0 {
        return Err(PianolaError::MalformedMidi {
            offset: division_offset,
            message: "ticks per quarter note is zero".to_string(),
        });
    }

    Ok(MidiHeader {
        format,
        track_count,
        ticks_per_quarter: division,
    })
}

fn decode_track(chunk: &mut ByteReader, track: usize) -> Result<Vec<RawEvent>, PianolaError> {
    let mut events = Vec::new();
    let mut state = DecodeState::AwaitingDelta;
    let mut time_ticks: u64 = 0;
    let mut running_status: Option<u8> = None;

    loop {
        state = match state {
            DecodeState::AwaitingDelta => {
                if chunk.is_at_end() {
                    break;
                }
                time_ticks += chunk.read_vlq()? as u64;
                DecodeState::AwaitingStatus
            }
            DecodeState::AwaitingStatus => {
                let byte = chunk.peek_u8()?;
                if byte & 0x80 == 0 {
                    // Running status: the byte is the first data byte
                    let status = running_status
                        .ok_or_else(|| chunk.error("data byte with no running status"))?;
                    DecodeState::AwaitingPayload(status)
                } else {
                    chunk.read_u8()?;
                    // Meta and sysex events leave the running status alone
                    if byte < 0xF0 {
                        running_status = Some(byte);
                    }
                    DecodeState::AwaitingPayload(byte)
                }
            }
            DecodeState::AwaitingPayload(status) => {
                if let Some(event) = read_payload(chunk, status, time_ticks, track)? {
                    events.push(event);
                }
                DecodeState::AwaitingDelta
            }
        };
    }

    Ok(events)
}

fn read_data_byte(chunk: &mut ByteReader) -> Result<u8, PianolaError> {
    let byte = chunk.peek_u8()?;
    if byte & 0x80 != 0 {
        return Err(chunk.error(format!("expected data byte, found status 0x{:02X}", byte)));
    }
    chunk.read_u8()
}

/// Consume the payload of `status`, returning a note event if it is one.
fn read_payload(
    chunk: &mut ByteReader,
    status: u8,
    time_ticks: u64,
    track: usize,
) -> Result<Option<RawEvent>, PianolaError> {
    match status >> 4 {
        0x8 | 0x9 => {
            let key = read_data_byte(chunk)?;
            let velocity = read_data_byte(chunk)?;
            let kind = if status >> 4 == 0x9 && velocity > 0 {
                EventKind::On
            } else {
                EventKind::Off
            };
            Ok(Some(RawEvent {
                time_ticks,
                key,
                kind,
                track,
            }))
        }
        // Program change, channel pressure
        0xC | 0xD => {
            log::trace!("skipping status 0x{:02X} at tick {}", status, time_ticks);
            chunk.skip(1)?;
            Ok(None)
        }
        // Aftertouch, control change, pitch bend
        0xA | 0xB | 0xE => {
            log::trace!("skipping status 0x{:02X} at tick {}", status, time_ticks);
            chunk.skip(2)?;
            Ok(None)
        }
        _ => match status {
            0xFF => {
                let meta_type = chunk.read_u8()?;
                let len = chunk.read_vlq()? as usize;
                log::trace!("skipping meta 0x{:02X} ({} bytes) at tick {}", meta_type, len, time_ticks);
                chunk.skip(len)?;
                Ok(None)
            }
            0xF0 | 0xF7 => {
                let len = chunk.read_vlq()? as usize;
                log::trace!("skipping sysex ({} bytes) at tick {}", len, time_ticks);
                chunk.skip(len)?;
                Ok(None)
            }
            _ => Err(chunk.error(format!("unexpected status byte 0x{:02X}", status))),
        },
    }
}
