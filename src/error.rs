//! # Error Types
//!
//! All fallible operations in the pipeline return [`PianolaError`].
//!
//! ## Error Types
//! - `InvalidNoteSyntax` - a note token that does not match the note grammar
//! - `MalformedMidi` - structural violation in a MIDI buffer, with the byte offset
//! - `UnsupportedDivision` - SMPTE time division in the MIDI header
//! - `SettingsError` - invalid settings YAML or out-of-range values
//! - `SheetError` - invalid sheet YAML
//!
//! Only MIDI decoding and settings/sheet loading are fatal. Note syntax errors are
//! dropped silently by the resolver, the schedule and the normalizer.
//!
//! ## Usage
//! ```rust
//! use pianola::{decode, PianolaError};
//!
//! match decode(b"RIFF....") {
//!     Ok(file) => println!("{} tracks", file.tracks.len()),
//!     Err(PianolaError::MalformedMidi { offset, message }) => {
//!         eprintln!("Bad MIDI at byte {}: {}", offset, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PianolaError {
    /// Note text that does not match `[^v]*[A-G]s?<digits>?`.
    ///
    /// # Example
    /// ```
    /// # use pianola::PianolaError;
    /// let err = PianolaError::InvalidNoteSyntax("H4".to_string());
    /// assert_eq!(err.to_string(), "Invalid note syntax: 'H4'");
    /// ```
    #[error("Invalid note syntax: '{0}'")]
    InvalidNoteSyntax(String),

    /// Structural MIDI violation: bad chunk magic, truncated chunk, an event
    /// running past the end of its track, or an unexpected status byte.
    ///
    /// # Example
    /// ```
    /// # use pianola::PianolaError;
    /// let err = PianolaError::MalformedMidi {
    ///     offset: 0,
    ///     message: "expected 'MThd' header".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Malformed MIDI at byte 0: expected 'MThd' header");
    /// ```
    #[error("Malformed MIDI at byte {offset}: {message}")]
    MalformedMidi { offset: usize, message: String },

    /// The header uses SMPTE timing instead of ticks per quarter note.
    #[error("Unsupported MIDI time division 0x{0:04X} (only ticks per quarter note are supported)")]
    UnsupportedDivision(u16),

    /// Settings YAML could not be read or holds an invalid value.
    #[error("Invalid settings: {0}")]
    SettingsError(String),

    /// Sheet YAML could not be read.
    #[error("Invalid sheet: {0}")]
    SheetError(String),
}
