//! Slice-by-slice hand assignment

use super::cluster::{balance, best_split_point, should_split, uncross};
use super::context::{HandContext, Lookahead};
use crate::config::ResolverConfig;
use crate::notation::{Hand, Segment};
use crate::pitch::{average_pitch, parse_chord, Note};

/// Notes assigned to each hand for one slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    pub left: Vec<Note>,
    pub right: Vec<Note>,
}

impl Assignment {
    fn one_hand(hand: Hand, notes: Vec<Note>) -> Self {
        match hand {
            Hand::Left => Self { left: notes, right: Vec::new() },
            Hand::Right => Self { left: Vec::new(), right: notes },
        }
    }

    pub fn left_text(&self) -> String {
        join(&self.left)
    }

    pub fn right_text(&self) -> String {
        join(&self.right)
    }
}

fn join(notes: &[Note]) -> String {
    notes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join("+")
}

/// Walks aligned slices, carrying [`HandContext`] from one to the next.
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    config: &'a ResolverConfig,
    context: HandContext,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            context: HandContext::default(),
        }
    }

    pub fn with_context(config: &'a ResolverConfig, context: HandContext) -> Self {
        Self { config, context }
    }

    pub fn context(&self) -> HandContext {
        self.context
    }

    /// The hand a pitch belongs to: the one whose previous position is closer
    /// (ties go right), or the side of the reference note without context.
    fn hand_for(&self, pitch: f64) -> Hand {
        match self.context.both() {
            Some((prev_left, prev_right)) => {
                if (pitch - prev_left).abs() < (pitch - prev_right).abs() {
                    Hand::Left
                } else {
                    Hand::Right
                }
            }
            None if pitch < self.config.reference.0 as f64 => Hand::Left,
            None => Hand::Right,
        }
    }

    /// Assign the notes of one slice, given as the raw chord text of each voice.
    pub fn assign(&self, left: &str, right: &str, lookahead: &Lookahead) -> Assignment {
        let mut notes = parse_chord(left);
        notes.extend(parse_chord(right));
        notes.sort_by_key(|n| n.pitch);

        let Some(centroid) = average_pitch(&notes) else {
            return Assignment::default();
        };

        if !should_split(&notes, self.config, &self.context, lookahead) {
            let hand = self.hand_for(centroid);
            log::trace!("{} note(s) kept together in the {:?} hand", notes.len(), hand);
            return Assignment::one_hand(hand, notes);
        }

        let split = best_split_point(&notes, self.config, &self.context);
        let mut right = notes.split_off(split);
        let mut left = notes;
        balance(&mut left, &mut right, self.config.hand_span_limit);
        uncross(&mut left, &mut right);
        log::trace!("split into {} left / {} right", left.len(), right.len());

        Assignment { left, right }
    }

    /// Final guard against a left hand sounding above the right hand.
    ///
    /// Recombines the slice and splits it at the reference note, or hands the
    /// whole slice to one side when the split would leave a hand empty.
    fn fix_crossing(&self, assignment: Assignment) -> Assignment {
        let left_max = assignment.left.iter().map(|n| n.pitch).max();
        let right_min = assignment.right.iter().map(|n| n.pitch).min();
        let crossed = matches!((left_max, right_min), (Some(high), Some(low)) if high > low);
        if !crossed {
            return assignment;
        }

        let mut notes = assignment.left;
        notes.extend(assignment.right);
        notes.sort_by_key(|n| n.pitch);

        let reference = self.config.reference;
        match notes.iter().position(|n| n.pitch >= reference) {
            Some(split) if split > 0 => {
                let right = notes.split_off(split);
                Assignment { left: notes, right }
            }
            _ => {
                let avg = average_pitch(&notes).unwrap_or_default();
                let hand = if avg < reference.0 as f64 { Hand::Left } else { Hand::Right };
                Assignment::one_hand(hand, notes)
            }
        }
    }

    /// Resolve one aligned slice and advance the context.
    pub fn resolve_slice(&mut self, left: &Segment, right: &Segment, lookahead: &Lookahead) -> (Segment, Segment) {
        let assignment = self.fix_crossing(self.assign(&left.notes, &right.notes, lookahead));
        self.context.update(&assignment.left, &assignment.right);

        // The longer hold wins; on a tie both are the same length anyway
        let delay = left.delay.max(right.delay);
        (
            Segment::new(assignment.left_text(), delay),
            Segment::new(assignment.right_text(), delay),
        )
    }

    /// Resolve two aligned voices, returning the corrected voices.
    pub fn resolve_segments(&mut self, left: &[Segment], right: &[Segment]) -> (Vec<Segment>, Vec<Segment>) {
        let mut out_left = Vec::with_capacity(left.len());
        let mut out_right = Vec::with_capacity(right.len());

        for (i, (a, b)) in left.iter().zip(right).enumerate() {
            let lookahead = Lookahead::of(left.get(i + 1), right.get(i + 1));
            let (l, r) = self.resolve_slice(a, b, &lookahead);
            // A slice with neither notes nor delay leaves no trace in the output
            if l.is_rest() && r.is_rest() && l.delay == 0 {
                continue;
            }
            out_left.push(l);
            out_right.push(r);
        }

        (out_left, out_right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_note_without_context() {
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&config);
        let none = Lookahead::default();

        assert_eq!(resolver.assign("", "G4", &none).right_text(), "G4");
        assert_eq!(resolver.assign("A3", "", &none).left_text(), "A3");
        assert_eq!(resolver.assign("C4", "", &none).right_text(), "C4");
    }

    #[test]
    fn test_single_note_follows_closer_hand() {
        let config = ResolverConfig::default();
        // Left hand has been playing around A3, right around C6
        let context = HandContext { prev_left: Some(45.0), prev_right: Some(72.0) };
        let resolver = Resolver::with_context(&config, context);

        // E4 (52) is closer to the left hand even though it is above C4
        let assignment = resolver.assign("", "E4", &Lookahead::default());
        assert_eq!(assignment.left_text(), "E4");
        assert!(assignment.right.is_empty());
    }

    #[test]
    fn test_equal_distance_goes_right() {
        let config = ResolverConfig::default();
        let context = HandContext { prev_left: Some(40.0), prev_right: Some(60.0) };
        let resolver = Resolver::with_context(&config, context);

        // Centroid of C4+E4 is 50, midway between the hands
        assert_eq!(resolver.assign("C4+E4", "", &Lookahead::default()).right_text(), "C4+E4");
    }

    #[test]
    fn test_fix_crossing_splits_at_reference() {
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&config);
        let crossed = Assignment {
            left: parse_chord("C3+E4"),
            right: parse_chord("A3+G4"),
        };
        let fixed = resolver.fix_crossing(crossed);
        assert_eq!(fixed.left_text(), "C3+A3");
        assert_eq!(fixed.right_text(), "E4+G4");
    }

    #[test]
    fn test_fix_crossing_one_side() {
        let config = ResolverConfig::default();
        let resolver = Resolver::new(&config);
        let crossed = Assignment {
            left: parse_chord("A3"),
            right: parse_chord("F3"),
        };
        let fixed = resolver.fix_crossing(crossed);
        assert_eq!(fixed.left_text(), "F3+A3");
        assert!(fixed.right.is_empty());
    }

    #[test]
    fn test_resolve_slice_updates_context() {
        let config = ResolverConfig::default();
        let mut resolver = Resolver::new(&config);
        let (left, right) = resolver.resolve_slice(
            &Segment::new("C3", 2),
            &Segment::new("C5", 4),
            &Lookahead::default(),
        );
        assert_eq!(left, Segment::new("C3", 4));
        assert_eq!(right, Segment::new("C5", 4));
        assert_eq!(resolver.context(), HandContext { prev_left: Some(36.0), prev_right: Some(60.0) });
    }
}
