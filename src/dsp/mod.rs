//! DSP: pure Rust tone synthesis.
//!
//! The same code feeds the page's AudioWorklet (via WASM) and the offline
//! WAV renderer, so both produce identical audio.

pub mod oscillator;
pub mod param;
pub mod renderer;
pub mod synth;
