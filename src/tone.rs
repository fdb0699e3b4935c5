//! Tone engine interface: what the controller needs from the audio side.

use serde::{Deserialize, Serialize};

/// One ear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const BOTH: [Channel; 2] = [Channel::Left, Channel::Right];

    /// Stereo placement: hard left or hard right.
    pub fn pan(self) -> f64 {
        match self {
            Channel::Left => -1.0,
            Channel::Right => 1.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

/// Two continuous sine generators, one per ear.
///
/// Times are in seconds on the engine's own monotonic clock
/// ([`current_time`](ToneEngine::current_time)).
pub trait ToneEngine {
    /// (Re)start both generators with their gains at zero.
    fn start_tones(&mut self, left_hz: f64, right_hz: f64);
    /// Silence both generators at engine time `at` (immediately if already past).
    fn stop_tones(&mut self, at: f64);
    /// Set a channel's frequency, gliding linearly over `glide` seconds if given.
    fn set_frequency(&mut self, channel: Channel, hz: f64, glide: Option<f64>);
    /// Set a channel's gain, fading linearly over `fade` seconds if given.
    fn set_gain(&mut self, channel: Channel, gain: f64, fade: Option<f64>);
    fn current_time(&self) -> f64;
    /// Whether the generators are running (started and not yet stopped).
    fn is_active(&self) -> bool;
}
