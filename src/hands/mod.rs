//! # Hands Module
//!
//! Re-derives which notes belong to the left hand and which to the right, slice by
//! slice, from two voice strings that may have been split badly (or not at all, as
//! with a merged MIDI import).
//!
//! ## Sub-modules
//! - `context` - [`HandContext`] (where each hand last played) and [`Lookahead`]
//! - `cluster` - span, split-or-not, split point, balancing
//! - `resolver` - [`Resolver`], which walks the aligned slices
//!
//! ## Per-Slice Decision
//! The notes of both voices are pooled and sorted by pitch, then:
//!
//! | Notes | Outcome |
//! |-------|---------|
//! | none | both hands empty |
//! | one | closer hand by context, else the side of the reference note |
//! | chord wider than the hand-span limit | split |
//! | chord within the comfortable span | one hand, unless neighbours alternate hands around the reference note |
//! | anything between | split only if it straddles the reference note |
//!
//! A split chooses the widest white-key gap (with a bonus near the reference note)
//! or, with context for both hands, the split that best continues them. The halves
//! are then balanced so neither hand exceeds the span limit and checked so the
//! hands never cross.
//!
//! ## Delays
//! Both output voices carry the longer of the two input delays for each slice, so
//! the hands stay in step.
//!
//! ## Example
//! ```rust
//! use pianola::config::ResolverConfig;
//! use pianola::hands::resolve_voices;
//! use pianola::notation::VoicePair;
//!
//! let merged = VoicePair::new("", "C3+G3+C5__E5__");
//! let resolved = resolve_voices(&merged, &ResolverConfig::default());
//!
//! assert_eq!(resolved.left, "C3+G3____");
//! assert_eq!(resolved.right, "C5__E5__");
//! ```

mod cluster;
mod context;
mod resolver;


pub use cluster::{balance, best_split_point, cluster_span, should_split, straddles, uncross};
pub use context::{HandContext, Lookahead};
pub use resolver::{Assignment, Resolver};

use crate::config::ResolverConfig;
use crate::notation::{align, format_voice, parse_voice, VoicePair};

/// Re-assign every slice of `pair` to the hands.
///
/// Never fails: invalid note tokens are dropped, and input with no notes at all
/// yields two empty voices.
pub fn resolve_voices(pair: &VoicePair, config: &ResolverConfig) -> VoicePair {
    let (left, right) = align(&parse_voice(&pair.left), &parse_voice(&pair.right));

    let mut resolver = Resolver::new(config);
    let (left, right) = resolver.resolve_segments(&left, &right);

    log::debug!("resolved {} slice(s) into left/right hands", left.len());

    VoicePair::new(format_voice(&left), format_voice(&right))
}
