//! # Timeline Quantizer
//!
//! Turns decoded note spans into the two voice strings.
//!
//! ## How Slicing Works
//! Every tick where a note starts or ends is a breakpoint. Consecutive breakpoints
//! bound a slice; each slice becomes one segment per voice:
//!
//! ```text
//! ticks     0         480       720
//!           |---C4----|         |
//!           |---E4--------------|
//! slices    [  0,480 )[480,720 )
//! right     C4+E4__________ _____
//! ```
//!
//! A chord lists only the notes that *start* at the slice's first tick; held notes
//! are implied by the delay that follows. Slices with no new notes emit only delay.
//!
//! ## Tracks
//! Track 0 is the right hand and track 1 the left. Further tracks are ignored.
//! In merged mode both tracks feed the right voice and the left stays empty,
//! leaving hand assignment to the resolver.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::QuantizeConfig;
use crate::midi::NoteSpan;
use crate::notation::{format_voice, Segment, VoicePair};

/// Sorted, de-duplicated breakpoint ticks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    breakpoints: Vec<u64>,
}

impl Timeline {
    /// Collect the start and end tick of every span.
    pub fn from_spans<'a>(spans: impl IntoIterator<Item = &'a NoteSpan>) -> Self {
        let mut ticks = BTreeSet::new();
        for span in spans {
            ticks.insert(span.start_ticks);
            ticks.insert(span.end_ticks());
        }
        Self {
            breakpoints: ticks.into_iter().collect(),
        }
    }

    pub fn breakpoints(&self) -> &[u64] {
        &self.breakpoints
    }

    /// `(t0, t1)` for each pair of consecutive breakpoints.
    pub fn slices(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.breakpoints.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of slices
    pub fn len(&self) -> usize {
        self.breakpoints.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Delay symbols for a slice of `ticks`: `max(1, round(ticks / tpq * resolution))`.
///
/// ```
/// use pianola::timeline::ticks_to_delay;
///
/// assert_eq!(ticks_to_delay(480, 480, 10), 10);
/// assert_eq!(ticks_to_delay(120, 480, 10), 3); // 2.5 rounds up
/// assert_eq!(ticks_to_delay(1, 480, 10), 1);
/// ```
pub fn ticks_to_delay(ticks: u64, ticks_per_quarter: u16, resolution: u32) -> usize {
    let units = (ticks as f64 / ticks_per_quarter.max(1) as f64 * resolution as f64).round();
    (units as usize).max(1)
}

/// Note names of one voice grouped by start tick, sorted within each chord
fn chords_by_start<'a>(spans: impl IntoIterator<Item = &'a NoteSpan>) -> BTreeMap<u64, Vec<String>> {
    let mut chords: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for span in spans {
        chords.entry(span.start_ticks).or_default().push(span.name());
    }
    for names in chords.values_mut() {
        names.sort();
    }
    chords
}

fn voice_segments(timeline: &Timeline, chords: &BTreeMap<u64, Vec<String>>, delays: &[usize]) -> Vec<Segment> {
    timeline
        .slices()
        .zip(delays)
        .map(|((t0, _), delay)| {
            let notes = chords.get(&t0).map(|names| names.join("+")).unwrap_or_default();
            Segment::new(notes, *delay)
        })
        .collect()
}

/// Quantize per-track spans into left/right voice strings.
///
/// # Example
/// ```
/// use pianola::config::QuantizeConfig;
/// use pianola::midi::NoteSpan;
/// use pianola::timeline::quantize;
///
/// let right = vec![NoteSpan { start_ticks: 0, duration_ticks: 480, key: 60, track: 0 }];
/// let left = vec![NoteSpan { start_ticks: 240, duration_ticks: 240, key: 48, track: 1 }];
///
/// let pair = quantize(&[right, left], 480, &QuantizeConfig::default());
/// assert_eq!(pair.right, "C4__________");
/// assert_eq!(pair.left, "_____C3_____");
/// ```
pub fn quantize(tracks: &[Vec<NoteSpan>], ticks_per_quarter: u16, config: &QuantizeConfig) -> VoicePair {
    let empty: Vec<NoteSpan> = Vec::new();
    let right = tracks.first().unwrap_or(&empty);
    let left = tracks.get(1).unwrap_or(&empty);

    if tracks.len() > 2 {
        log::debug!("ignoring {} track(s) beyond the first two", tracks.len() - 2);
    }

    let timeline = Timeline::from_spans(right.iter().chain(left.iter()));
    let delays: Vec<usize> = timeline
        .slices()
        .map(|(t0, t1)| ticks_to_delay(t1 - t0, ticks_per_quarter, config.resolution))
        .collect();

    log::debug!(
        "quantizing {} breakpoint(s) into {} slice(s) at resolution {}",
        timeline.breakpoints().len(),
        timeline.len(),
        config.resolution
    );

    if config.merged {
        let chords = chords_by_start(right.iter().chain(left.iter()));
        return VoicePair::new("", format_voice(&voice_segments(&timeline, &chords, &delays)));
    }

    let right_voice = voice_segments(&timeline, &chords_by_start(right), &delays);
    let left_voice = voice_segments(&timeline, &chords_by_start(left), &delays);
    VoicePair::new(format_voice(&left_voice), format_voice(&right_voice))
}
