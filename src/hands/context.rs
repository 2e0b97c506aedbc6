//! Hand context threaded between slices

use crate::notation::Segment;
use crate::pitch::{average_pitch, parse_chord, Note};

/// Average pitch each hand played most recently.
///
/// A hand that receives no notes in a slice keeps its previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandContext {
    pub prev_left: Option<f64>,
    pub prev_right: Option<f64>,
}

impl HandContext {
    /// Both previous pitches, when each hand has played something
    pub fn both(&self) -> Option<(f64, f64)> {
        Some((self.prev_left?, self.prev_right?))
    }

    /// Record the notes each hand received in a slice.
    pub fn update(&mut self, left: &[Note], right: &[Note]) {
        if let Some(avg) = average_pitch(left) {
            self.prev_left = Some(avg);
        }
        if let Some(avg) = average_pitch(right) {
            self.prev_right = Some(avg);
        }
    }
}

/// Average pitches of the next aligned input segments
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lookahead {
    pub next_left: Option<f64>,
    pub next_right: Option<f64>,
}

impl Lookahead {
    pub fn of(left: Option<&Segment>, right: Option<&Segment>) -> Self {
        let avg = |segment: Option<&Segment>| segment.and_then(|s| average_pitch(&parse_chord(&s.notes)));
        Self {
            next_left: avg(left),
            next_right: avg(right),
        }
    }

    pub fn both(&self) -> Option<(f64, f64)> {
        Some((self.next_left?, self.next_right?))
    }
}
