//! Integration tests for the notation pipeline
//!
//! MIDI fixtures are written with `midly`, then run through import, resort and
//! schedule.

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Fps, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use pianola::{
    decode, import_midi, resort, schedule_voices, Hand, PianolaError, Settings, Sheet, VoicePair,
};

const TICKS_PER_QUARTER: u16 = 480;
const QUARTER: u32 = TICKS_PER_QUARTER as u32;

/// Build a track from `(start, duration, key)` notes
fn note_track(notes: &[(u32, u32, u8)]) -> Track<'static> {
    let mut events: Vec<(u32, bool, u8)> = Vec::new();
    for &(start, duration, key) in notes {
        events.push((start, true, key));
        events.push((start + duration, false, key));
    }
    // Note-offs sort before note-ons at the same tick
    events.sort();

    let mut track = Vec::new();
    let mut last = 0;
    for (tick, on, key) in events {
        let message = if on {
            MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(90) }
        } else {
            MidiMessage::NoteOff { key: u7::new(key), vel: u7::new(0) }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last),
            kind: TrackEventKind::Midi { channel: u4::new(0), message },
        });
        last = tick;
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

fn write_smf(timing: Timing, tracks: Vec<Track<'static>>) -> Vec<u8> {
    let mut smf = Smf::new(Header::new(Format::Parallel, timing));
    smf.tracks = tracks;
    let mut buf = Vec::new();
    smf.write(&mut buf).unwrap();
    buf
}

fn smf_bytes(tracks: Vec<Track<'static>>) -> Vec<u8> {
    write_smf(Timing::Metrical(u15::new(TICKS_PER_QUARTER)), tracks)
}

/// Right hand C4 then E4, left hand C3 held under both
fn two_hand_file() -> Vec<u8> {
    smf_bytes(vec![
        note_track(&[(0, QUARTER, 60), (QUARTER, QUARTER, 64)]),
        note_track(&[(0, 2 * QUARTER, 48)]),
    ])
}

#[test]
fn test_decode_written_file() {
    let file = decode(&two_hand_file()).unwrap();
    assert_eq!(file.format, 1);
    assert_eq!(file.ticks_per_quarter, TICKS_PER_QUARTER);
    assert_eq!(file.tracks.len(), 2);
    assert_eq!(file.tracks[0].len(), 2);
    assert_eq!(file.tracks[1][0].duration_ticks, 960);
    assert_eq!(file.tracks[1][0].name(), "C3");
}

#[test]
fn test_import_two_tracks() {
    let pair = import_midi(&two_hand_file(), &Settings::default()).unwrap();
    assert_eq!(pair.right, "C4__________E4__________");
    assert_eq!(pair.left, "C3____________________");
}

#[test]
fn test_merged_import_is_resorted() {
    let separate = import_midi(&two_hand_file(), &Settings::default()).unwrap();

    let settings = Settings::from_yaml("quantize:\n  merged: true\n").unwrap();
    let merged = import_midi(&two_hand_file(), &settings).unwrap();

    assert_eq!(merged, separate);
}

#[test]
fn test_single_track_chord_is_split_by_resort() {
    // C3+G3+C5 all in the right-hand track
    let bytes = smf_bytes(vec![note_track(&[(0, QUARTER, 48), (0, QUARTER, 55), (0, QUARTER, 72)])]);

    let imported = import_midi(&bytes, &Settings::default()).unwrap();
    assert_eq!(imported.right, "C3+C5+G3__________");
    assert_eq!(imported.left, "__________");

    let resorted = resort(&imported, &Settings::default().resolver);
    assert_eq!(resorted.left, "C3+G3__________");
    assert_eq!(resorted.right, "C5__________");
}

#[test]
fn test_other_events_do_not_change_the_import() {
    let mut right = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Right hand")),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::ProgramChange { program: u7::new(0) },
            },
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::Controller { controller: u7::new(64), value: u7::new(127) },
            },
        },
    ];
    right.extend(note_track(&[(0, QUARTER, 60), (QUARTER, QUARTER, 64)]));
    let left = note_track(&[(0, 2 * QUARTER, 48)]);

    let pair = import_midi(&smf_bytes(vec![right, left]), &Settings::default()).unwrap();
    assert_eq!(pair, import_midi(&two_hand_file(), &Settings::default()).unwrap());
}

#[test]
fn test_resolution_setting() {
    let settings = Settings::from_yaml("quantize:\n  resolution: 4\n").unwrap();
    let pair = import_midi(&two_hand_file(), &settings).unwrap();
    assert_eq!(pair.right, "C4____E4____");
    assert_eq!(pair.left, "C3________");
}

#[test]
fn test_schedule_after_import() {
    let pair = import_midi(&two_hand_file(), &Settings::default()).unwrap();
    let notes = schedule_voices(&pair, &Settings::default().schedule);

    let summary: Vec<(&str, Hand, u64, u64)> = notes
        .iter()
        .map(|n| (n.name.as_str(), n.hand, n.start_ms, n.duration_ms))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("C3", Hand::Left, 0, 1500),
            ("C4", Hand::Right, 0, 750),
            ("E4", Hand::Right, 750, 750),
        ]
    );
    assert_eq!(notes[0].midi_key, 48);
    assert_eq!(notes[2].midi_key, 64);
}

#[test]
fn test_sheet_from_import() {
    let pair = import_midi(&two_hand_file(), &Settings::default()).unwrap();
    let yaml = Sheet::new(pair.clone()).to_yaml().unwrap();
    assert_eq!(Sheet::from_yaml(&yaml).unwrap().voices(), pair);
}

#[test]
fn test_typed_sheet_resorts_and_schedules() {
    let sheet = Sheet::from_yaml("title: Typed\nright: \"c3+g3+^c  e5 \"\n").unwrap();
    assert_eq!(sheet.right, "C3+G3+C5__E5_");

    let resorted = resort(&sheet.voices(), &Settings::default().resolver);
    assert_eq!(resorted, VoicePair::new("C3+G3___", "C5__E5_"));

    let notes = schedule_voices(&resorted, &Settings::default().schedule);
    assert_eq!(notes.len(), 4);
    assert!(notes.windows(2).all(|w| w[0].start_ms <= w[1].start_ms));
}

#[test]
fn test_truncated_file_is_rejected() {
    let bytes = two_hand_file();
    let err = import_midi(&bytes[..bytes.len() - 3], &Settings::default()).unwrap_err();
    assert!(matches!(err, PianolaError::MalformedMidi { .. }));
}

#[test]
fn test_smpte_file_is_rejected() {
    let bytes = write_smf(
        Timing::Timecode(Fps::Fps25, 40),
        vec![note_track(&[(0, 40, 60)])],
    );
    let err = import_midi(&bytes, &Settings::default()).unwrap_err();
    assert!(matches!(err, PianolaError::UnsupportedDivision(_)));
}

#[test]
fn test_not_a_midi_file() {
    let err = import_midi(b"RIFF\x00\x00\x00\x04WAVE", &Settings::default()).unwrap_err();
    assert!(matches!(err, PianolaError::MalformedMidi { offset: 0, .. }));
}
