//! # Settings
//!
//! Tunable constants for the pipeline, loaded from YAML. Every key is optional:
//!
//! ```yaml
//! quantize:
//!   resolution: 10        # delay symbols per quarter note
//!   merged: false         # import both tracks into the right voice
//! resolver:
//!   hand-span-limit: 8    # widest chord one hand plays, in white keys
//!   comfortable-span: 5   # chords this narrow stay in one hand by default
//!   reference-note: C4    # boundary between the hands
//!   proximity-semitones: 6
//!   proximity-bonus: 2    # split-score bonus for gaps near the reference note
//! schedule:
//!   unit-ms: 75           # milliseconds per delay symbol
//!   bare-chord-ms: 50     # advance after a chord with no delay
//! ```
//!
//! The hand-span thresholds were tuned by ear for piano fingering; they are the
//! first place to look when resolver output differs from expectations.

use crate::error::PianolaError;
use crate::pitch::{name_to_pitch, Pitch};
use serde::Deserialize;

/// Largest accepted `quantize.resolution`
pub const MAX_RESOLUTION: u32 = 1000;

/// Timeline quantizer options
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeConfig {
    /// Delay symbols per quarter note
    pub resolution: u32,
    /// Combine both tracks into the right voice and leave the left empty
    pub merged: bool,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            merged: false,
        }
    }
}

/// Hand-assignment thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub hand_span_limit: u32,
    pub comfortable_span: u32,
    pub reference: Pitch,
    pub proximity_semitones: f64,
    pub proximity_bonus: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            hand_span_limit: 8,
            comfortable_span: 5,
            reference: Pitch::MIDDLE_C,
            proximity_semitones: 6.0,
            proximity_bonus: 2,
        }
    }
}

/// Playback schedule timing
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub unit_ms: u32,
    pub bare_chord_ms: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            unit_ms: 75,
            bare_chord_ms: 50,
        }
    }
}

/// All pipeline settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub quantize: QuantizeConfig,
    pub resolver: ResolverConfig,
    pub schedule: ScheduleConfig,
}

/// Raw settings for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub quantize: RawQuantize,
    #[serde(default)]
    pub resolver: RawResolver,
    #[serde(default)]
    pub schedule: RawSchedule,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawQuantize {
    pub resolution: Option<u32>,
    pub merged: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawResolver {
    pub hand_span_limit: Option<u32>,
    pub comfortable_span: Option<u32>,
    pub reference_note: Option<String>,
    pub proximity_semitones: Option<f64>,
    pub proximity_bonus: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawSchedule {
    pub unit_ms: Option<u32>,
    pub bare_chord_ms: Option<u32>,
}

impl Settings {
    /// Parse settings YAML, filling missing keys with defaults.
    ///
    /// ```
    /// use pianola::Settings;
    ///
    /// let settings = Settings::from_yaml("resolver:\n  hand-span-limit: 9\n").unwrap();
    /// assert_eq!(settings.resolver.hand_span_limit, 9);
    /// assert_eq!(settings.quantize.resolution, 10);
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, PianolaError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSettings = serde_yaml::from_str(content)
            .map_err(|e| PianolaError::SettingsError(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, PianolaError> {
        let defaults = Settings::default();

        let resolution = raw.quantize.resolution.unwrap_or(defaults.quantize.resolution);
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return Err(PianolaError::SettingsError(format!(
                "quantize.resolution must be between 1 and {}, got {}",
                MAX_RESOLUTION, resolution
            )));
        }

        let hand_span_limit = raw
            .resolver
            .hand_span_limit
            .unwrap_or(defaults.resolver.hand_span_limit);
        let comfortable_span = raw
            .resolver
            .comfortable_span
            .unwrap_or(defaults.resolver.comfortable_span);
        if comfortable_span > hand_span_limit {
            return Err(PianolaError::SettingsError(format!(
                "resolver.comfortable-span ({}) must not exceed resolver.hand-span-limit ({})",
                comfortable_span, hand_span_limit
            )));
        }

        let reference = match &raw.resolver.reference_note {
            Some(name) => name_to_pitch(name).map_err(|_| {
                PianolaError::SettingsError(format!("Invalid reference note: {}", name))
            })?,
            None => defaults.resolver.reference,
        };

        let proximity_semitones = raw
            .resolver
            .proximity_semitones
            .unwrap_or(defaults.resolver.proximity_semitones);
        if !proximity_semitones.is_finite() || proximity_semitones < 0.0 {
            return Err(PianolaError::SettingsError(format!(
                "resolver.proximity-semitones must be a non-negative number, got {}",
                proximity_semitones
            )));
        }

        Ok(Settings {
            quantize: QuantizeConfig {
                resolution,
                merged: raw.quantize.merged.unwrap_or(defaults.quantize.merged),
            },
            resolver: ResolverConfig {
                hand_span_limit,
                comfortable_span,
                reference,
                proximity_semitones,
                proximity_bonus: raw
                    .resolver
                    .proximity_bonus
                    .unwrap_or(defaults.resolver.proximity_bonus),
            },
            schedule: ScheduleConfig {
                unit_ms: raw.schedule.unit_ms.unwrap_or(defaults.schedule.unit_ms),
                bare_chord_ms: raw
                    .schedule
                    .bare_chord_ms
                    .unwrap_or(defaults.schedule.bare_chord_ms),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_are_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_full_settings() {
        let source = r#"
quantize:
  resolution: 4
  merged: true
resolver:
  hand-span-limit: 9
  comfortable-span: 4
  reference-note: B3
  proximity-semitones: 3.5
  proximity-bonus: 1
schedule:
  unit-ms: 100
  bare-chord-ms: 40
"#;
        let settings = Settings::from_yaml(source).unwrap();
        assert_eq!(settings.quantize, QuantizeConfig { resolution: 4, merged: true });
        assert_eq!(settings.resolver.hand_span_limit, 9);
        assert_eq!(settings.resolver.comfortable_span, 4);
        assert_eq!(settings.resolver.reference, Pitch(47));
        assert_eq!(settings.resolver.proximity_semitones, 3.5);
        assert_eq!(settings.resolver.proximity_bonus, 1);
        assert_eq!(settings.schedule, ScheduleConfig { unit_ms: 100, bare_chord_ms: 40 });
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let err = Settings::from_yaml("quantize:\n  resolution: 0\n").unwrap_err();
        assert!(matches!(err, PianolaError::SettingsError(_)));
    }

    #[test]
    fn test_resolution_is_capped() {
        let settings = Settings::from_yaml("quantize:\n  resolution: 1000\n").unwrap();
        assert_eq!(settings.quantize.resolution, MAX_RESOLUTION);

        let err = Settings::from_yaml("quantize:\n  resolution: 4294967295\n").unwrap_err();
        assert_eq!(
            err,
            PianolaError::SettingsError(
                "quantize.resolution must be between 1 and 1000, got 4294967295".to_string()
            )
        );
    }

    #[test]
    fn test_comfortable_span_above_limit_is_rejected() {
        let source = "resolver:\n  hand-span-limit: 4\n  comfortable-span: 5\n";
        assert!(Settings::from_yaml(source).is_err());
    }

    #[test]
    fn test_bad_reference_note() {
        let err = Settings::from_yaml("resolver:\n  reference-note: H9\n").unwrap_err();
        assert_eq!(
            err,
            PianolaError::SettingsError("Invalid reference note: H9".to_string())
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Settings::from_yaml("resolver:\n  span: 3\n").is_err());
    }
}
