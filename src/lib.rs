pub mod api;
pub mod config;
pub mod error;
pub mod hands;
pub mod midi;
pub mod notation;
pub mod pitch;
pub mod schedule;
pub mod timeline;

pub use api::{import_midi, resort, Sheet};
pub use config::Settings;
pub use error::*;
pub use hands::resolve_voices;
pub use midi::decode;
pub use notation::{normalize_voice, Hand, VoicePair};
pub use pitch::{name_to_pitch, pitch_to_name, Note, Pitch};
pub use schedule::{schedule_voices, ScheduledNote};
