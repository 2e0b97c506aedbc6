use serde::Serialize;
use wasm_bindgen::prelude::*;

use pianola::{PianolaError, Settings, VoicePair};

#[derive(Serialize, Debug, PartialEq)]
struct PipelineError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
}

fn error_to_pipeline_error(e: PianolaError) -> PipelineError {
    match e {
        PianolaError::MalformedMidi { offset, message } => PipelineError {
            message,
            offset: Some(offset),
        },
        other => PipelineError {
            message: other.to_string(),
            offset: None,
        },
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"message\":\"{}\"}}", e))
}

fn to_js_error(e: PianolaError) -> JsValue {
    JsValue::from_str(&to_json(&error_to_pipeline_error(e)))
}

/// Settings from optional YAML; `None` or blank means defaults
fn load_settings(settings_yaml: Option<String>) -> Result<Settings, PianolaError> {
    Settings::from_yaml(settings_yaml.as_deref().unwrap_or_default())
}

/// Import MIDI bytes, returning `{ "left": ..., "right": ... }`
#[wasm_bindgen]
pub fn import_midi(bytes: &[u8], settings_yaml: Option<String>) -> Result<String, JsValue> {
    let settings = load_settings(settings_yaml).map_err(to_js_error)?;
    pianola::import_midi(bytes, &settings)
        .map(|pair| to_json(&pair))
        .map_err(to_js_error)
}

/// Re-assign notes to hands, returning `{ "left": ..., "right": ... }`
#[wasm_bindgen]
pub fn resort_notes(left: &str, right: &str, settings_yaml: Option<String>) -> Result<String, JsValue> {
    let settings = load_settings(settings_yaml).map_err(to_js_error)?;
    let pair = VoicePair::new(
        pianola::normalize_voice(left),
        pianola::normalize_voice(right),
    );
    Ok(to_json(&pianola::resort(&pair, &settings.resolver)))
}

/// Playback schedule as a JSON array of notes
#[wasm_bindgen]
pub fn schedule(left: &str, right: &str, settings_yaml: Option<String>) -> Result<String, JsValue> {
    let settings = load_settings(settings_yaml).map_err(to_js_error)?;
    let pair = VoicePair::new(
        pianola::normalize_voice(left),
        pianola::normalize_voice(right),
    );
    Ok(to_json(&pianola::schedule_voices(&pair, &settings.schedule)))
}

/// Normalize hand-typed notation
#[wasm_bindgen]
pub fn normalize(raw: &str) -> String {
    pianola::normalize_voice(raw)
}
