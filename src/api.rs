//! # Public API
//!
//! One-call entry points over the pipeline stages.
//!
//! ## Functions
//! - [`import_midi()`] - MIDI bytes to left/right voice strings
//! - [`resort()`] - re-derive the hand of every slice
//! - [`crate::schedule_voices()`] - voice strings to a timed note list
//! - [`crate::normalize_voice()`] - clean up hand-typed notation
//!
//! ## Sheets
//! A [`Sheet`] is the YAML file the CLI reads and writes:
//!
//! ```yaml
//! title: Minuet in G
//! composer: Petzold
//! left: G2+B2+D3__________
//! right: D4_____G3__A3__
//! ```
//!
//! Voices are normalized on load, so a sheet may use the forgiving input syntax
//! (`g3 b3`, `vD`, `F#4`).

use serde::{Deserialize, Serialize};

use crate::config::{ResolverConfig, Settings};
use crate::error::PianolaError;
use crate::hands::resolve_voices;
use crate::midi;
use crate::notation::{normalize_voice, VoicePair};
use crate::timeline::quantize;

/// Import a Standard MIDI File as two voice strings.
///
/// Track 0 becomes the right hand and track 1 the left; a missing track still
/// gets the delay run of every slice. With
/// `settings.quantize.merged` both tracks are pooled and the hands are assigned
/// by the resolver instead.
///
/// # Example
/// ```rust
/// use pianola::{import_midi, Settings};
///
/// let parts: [&[u8]; 7] = [
///     b"MThd", &[0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0],
///     b"MTrk", &[0, 0, 0, 13],
///     &[0x00, 0x90, 48, 100],
///     &[0x83, 0x60, 0x80, 48, 0],
///     &[0x00, 0xFF, 0x2F, 0x00],
/// ];
///
/// let pair = import_midi(&parts.concat(), &Settings::default())?;
/// assert_eq!(pair.right, "C3__________");
/// assert_eq!(pair.left, "__________");
/// # Ok::<(), pianola::PianolaError>(())
/// ```
///
/// # Errors
/// [`PianolaError::MalformedMidi`] or [`PianolaError::UnsupportedDivision`] when
/// the buffer cannot be decoded. Nothing is returned for a partial decode.
pub fn import_midi(bytes: &[u8], settings: &Settings) -> Result<VoicePair, PianolaError> {
    let file = midi::decode(bytes)?;
    let pair = quantize(&file.tracks, file.ticks_per_quarter, &settings.quantize);

    if settings.quantize.merged {
        return Ok(resort(&pair, &settings.resolver));
    }
    Ok(pair)
}

/// Re-assign every slice of both voices to the hand that should play it.
pub fn resort(pair: &VoicePair, config: &ResolverConfig) -> VoicePair {
    resolve_voices(pair, config)
}

/// Raw sheet for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct RawSheet {
    title: Option<String>,
    composer: Option<String>,
    left: Option<String>,
    right: Option<String>,
}

/// A piece: optional metadata plus normalized left/right voices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    pub left: String,
    pub right: String,
}

impl Sheet {
    pub fn new(voices: VoicePair) -> Self {
        Self {
            left: voices.left,
            right: voices.right,
            ..Default::default()
        }
    }

    /// Parse sheet YAML, normalizing both voices.
    ///
    /// ```
    /// use pianola::Sheet;
    ///
    /// let sheet = Sheet::from_yaml("title: Scale\nright: c d e f#\n").unwrap();
    /// assert_eq!(sheet.title.as_deref(), Some("Scale"));
    /// assert_eq!(sheet.right, "C4_D4_E4_Fs4");
    /// assert_eq!(sheet.left, "");
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, PianolaError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSheet =
            serde_yaml::from_str(content).map_err(|e| PianolaError::SheetError(e.to_string()))?;

        Ok(Sheet {
            title: raw.title,
            composer: raw.composer,
            left: raw.left.as_deref().map(normalize_voice).unwrap_or_default(),
            right: raw.right.as_deref().map(normalize_voice).unwrap_or_default(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, PianolaError> {
        serde_yaml::to_string(self).map_err(|e| PianolaError::SheetError(e.to_string()))
    }

    pub fn voices(&self) -> VoicePair {
        VoicePair::new(self.left.clone(), self.right.clone())
    }

    /// Replace the voices, keeping the metadata.
    pub fn with_voices(self, voices: VoicePair) -> Self {
        Self {
            left: voices.left,
            right: voices.right,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_round_trip() {
        let sheet = Sheet {
            title: Some("Test".to_string()),
            composer: None,
            left: "C3__________".to_string(),
            right: "E4+G4__________".to_string(),
        };
        let yaml = sheet.to_yaml().unwrap();
        assert!(!yaml.contains("composer"));
        assert_eq!(Sheet::from_yaml(&yaml).unwrap(), sheet);
    }

    #[test]
    fn test_sheet_normalizes_voices() {
        let sheet = Sheet::from_yaml("left: \"vc+vg  \"\nright: ^C\n").unwrap();
        assert_eq!(sheet.left, "C3+G3__");
        assert_eq!(sheet.right, "C5");
    }

    #[test]
    fn test_empty_sheet() {
        assert_eq!(Sheet::from_yaml("").unwrap(), Sheet::default());
        assert_eq!(Sheet::from_yaml("title: Only a title").unwrap().voices(), VoicePair::default());
    }

    #[test]
    fn test_sheet_rejects_unknown_keys() {
        let err = Sheet::from_yaml("middle: C4").unwrap_err();
        assert!(matches!(err, PianolaError::SheetError(_)));
    }

    #[test]
    fn test_sheet_rejects_invalid_yaml() {
        assert!(matches!(
            Sheet::from_yaml("left: [unclosed").unwrap_err(),
            PianolaError::SheetError(_)
        ));
    }

    #[test]
    fn test_with_voices_keeps_metadata() {
        let sheet = Sheet {
            title: Some("Piece".to_string()),
            ..Default::default()
        }
        .with_voices(VoicePair::new("C3_", "C5_"));
        assert_eq!(sheet.title.as_deref(), Some("Piece"));
        assert_eq!(sheet.voices(), VoicePair::new("C3_", "C5_"));
    }

    #[test]
    fn test_resort_is_resolve() {
        let pair = VoicePair::new("", "C3+G3+C5__");
        assert_eq!(
            resort(&pair, &ResolverConfig::default()),
            VoicePair::new("C3+G3__", "C5__")
        );
    }
}
