pub mod config;
pub mod controller;
pub mod display;
pub mod dsp;
pub mod error;
pub mod preset;
pub mod ramp;
pub mod scheduler;
pub mod series;
pub mod session;
pub mod tone;
pub mod web;

use crate::config::PlayerConfig;
use crate::preset::Preset;
use wasm_bindgen::prelude::*;

pub use crate::controller::{
    PlaybackController, PlaybackState, StateSnapshot, TickOutcome, Transition,
};
pub use crate::error::{BinauralError, Result};
pub use crate::session::Session;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Volume used by the one-shot render exports.
const RENDER_VOLUME: f64 = 0.5;

/// WASM-exposed: return the binaural-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: validate a preset JSON object. Errors with the reason.
#[wasm_bindgen]
pub fn validate_preset(preset_json: &str) -> Result<(), JsValue> {
    Preset::from_json(preset_json)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render a whole preset session to a WAV byte array.
#[wasm_bindgen]
pub fn render_preset_wav(preset_json: &str, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let preset = Preset::from_json(preset_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let config = PlayerConfig::default().with_sample_rate(sample_rate);
    dsp::renderer::render_preset_wav(&preset, &config, RENDER_VOLUME)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: render a whole preset session to interleaved stereo f32
/// samples. Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_preset_samples(preset_json: &str, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let preset = Preset::from_json(preset_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let config = PlayerConfig::default().with_sample_rate(sample_rate);
    dsp::renderer::render_preset_samples(&preset, &config, RENDER_VOLUME)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}
