//! Split decisions for a cluster of simultaneous notes
//!
//! Every function here takes the cluster sorted ascending by pitch.

use super::context::{HandContext, Lookahead};
use crate::config::ResolverConfig;
use crate::pitch::{average_pitch, white_key_distance, Note, Pitch};

/// Width of a sorted cluster in white keys; zero for fewer than two notes.
pub fn cluster_span(notes: &[Note]) -> u32 {
    match (notes.first(), notes.last()) {
        (Some(low), Some(high)) if notes.len() > 1 => white_key_distance(low.pitch, high.pitch),
        _ => 0,
    }
}

/// Lowest note below `reference` and highest at or above it
pub fn straddles(notes: &[Note], reference: Pitch) -> bool {
    match (notes.first(), notes.last()) {
        (Some(low), Some(high)) => low.pitch < reference && high.pitch >= reference,
        _ => false,
    }
}

/// Whether a cluster of two or more notes should be shared between the hands.
pub fn should_split(notes: &[Note], config: &ResolverConfig, context: &HandContext, lookahead: &Lookahead) -> bool {
    if notes.len() <= 1 {
        return false;
    }

    let span = cluster_span(notes);
    if span > config.hand_span_limit {
        return true;
    }

    let reference = config.reference.0 as f64;
    if span <= config.comfortable_span {
        // Narrow chords stay in one hand unless both neighbours clearly alternate
        // hands around the reference note
        return match (context.both(), lookahead.both()) {
            (Some((prev_left, prev_right)), Some((next_left, next_right))) => {
                prev_left < reference
                    && prev_right >= reference
                    && next_left < reference
                    && next_right >= reference
                    && straddles(notes, config.reference)
            }
            _ => false,
        };
    }

    straddles(notes, config.reference)
}

/// Index where the right hand's notes begin.
///
/// Picks the widest white-key gap, favouring gaps close to the reference note.
/// When both hands have context, the split that best continues the previous
/// hand positions wins instead.
pub fn best_split_point(notes: &[Note], config: &ResolverConfig, context: &HandContext) -> usize {
    if notes.len() <= 1 {
        return 0;
    }

    let reference = config.reference.0 as f64;
    let mut best_score: Option<u32> = None;
    let mut split = notes.len() / 2;

    for (i, pair) in notes.windows(2).enumerate() {
        let gap = white_key_distance(pair[0].pitch, pair[1].pitch);
        let midpoint = (f64::from(pair[0].pitch.0) + f64::from(pair[1].pitch.0)) / 2.0;
        let bonus = if (midpoint - reference).abs() < config.proximity_semitones {
            config.proximity_bonus
        } else {
            0
        };
        let score = gap + bonus;
        if best_score.map_or(true, |best| score > best) {
            best_score = Some(score);
            split = i + 1;
        }
    }

    if let Some((prev_left, prev_right)) = context.both() {
        let mut best_continuity = f64::NEG_INFINITY;
        for i in 1..notes.len() {
            let (left, right) = notes.split_at(i);
            let (Some(left_avg), Some(right_avg)) = (average_pitch(left), average_pitch(right)) else {
                continue;
            };
            let continuity = -((left_avg - prev_left).abs() + (right_avg - prev_right).abs());
            if continuity > best_continuity {
                best_continuity = continuity;
                split = i;
            }
        }
    }

    split
}

/// Hand notes across until neither hand is wider than the limit, or a move
/// would push the receiving hand past it.
pub fn balance(left: &mut Vec<Note>, right: &mut Vec<Note>, limit: u32) {
    while cluster_span(left) > limit && left.len() > 1 {
        if let Some(note) = left.pop() {
            right.insert(0, note);
        }
        if cluster_span(right) > limit {
            break;
        }
    }

    while cluster_span(right) > limit && right.len() > 1 {
        let note = right.remove(0);
        left.push(note);
        if cluster_span(left) > limit {
            break;
        }
    }
}

/// Move the left hand's highest notes to the right until the hands no longer cross.
pub fn uncross(left: &mut Vec<Note>, right: &mut Vec<Note>) {
    while let (Some(high), Some(low)) = (left.last(), right.first()) {
        if high.pitch <= low.pitch {
            break;
        }
        if let Some(note) = left.pop() {
            right.insert(0, note);
        }
    }
}
