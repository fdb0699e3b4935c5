//! Preset types for binaural sessions.
//!
//! A preset fixes the left-ear tone, the right-ear ramp and the session
//! length. The JSON form uses the keys the page has always written to
//! `localStorage` (`left`, `rightStart`, `rightEnd`, `duration`, `total`),
//! so presets saved by older versions of the page load unchanged.

pub mod store;
pub use store::*;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{BinauralError, Result};

// ── Preset ──────────────────────────────────────────────────

/// Frequencies the preset form accepts, in whole Hz.
pub const USER_FREQUENCY_HZ: RangeInclusive<f64> = 20.0..=2000.0;
/// Ramp and total durations the preset form accepts, in seconds.
pub const USER_DURATION_SECS: RangeInclusive<u32> = 10..=7200;

/// A named parameter bundle for one binaural session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name. Built-in presets always carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Left-ear frequency in Hz, constant for the whole session.
    #[serde(rename = "left")]
    pub left_frequency: f64,
    /// Right-ear frequency in Hz at elapsed = 0.
    #[serde(rename = "rightStart")]
    pub right_start: f64,
    /// Right-ear frequency in Hz once the ramp is done.
    #[serde(rename = "rightEnd")]
    pub right_end: f64,
    /// Length of the ramp phase in seconds.
    #[serde(rename = "duration")]
    pub ramp_duration: u32,
    /// Length of the whole session in seconds (ramp + hold).
    #[serde(rename = "total")]
    pub total_duration: u32,
}

impl Preset {
    pub fn new(
        left_frequency: f64,
        right_start: f64,
        right_end: f64,
        ramp_duration: u32,
        total_duration: u32,
    ) -> Self {
        Preset {
            name: None,
            left_frequency,
            right_start,
            right_end,
            ramp_duration,
            total_duration,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check the preset invariants:
    /// `right_end >= right_start >= 0` and `0 < ramp_duration <= total_duration`.
    pub fn validate(&self) -> Result<()> {
        let freqs = [
            ("left frequency", self.left_frequency),
            ("right start frequency", self.right_start),
            ("right end frequency", self.right_end),
        ];
        for (what, hz) in freqs {
            if !hz.is_finite() {
                return Err(BinauralError::InvalidPreset(format!("{what} is not finite")));
            }
            if hz < 0.0 {
                return Err(BinauralError::InvalidPreset(format!(
                    "{what} must not be negative, got {hz}"
                )));
            }
        }
        if self.right_end < self.right_start {
            return Err(BinauralError::InvalidPreset(format!(
                "right end {} Hz is below right start {} Hz",
                self.right_end, self.right_start
            )));
        }
        if self.ramp_duration == 0 {
            return Err(BinauralError::InvalidPreset(
                "ramp duration must be positive".to_string(),
            ));
        }
        if self.ramp_duration > self.total_duration {
            return Err(BinauralError::InvalidPreset(format!(
                "ramp duration {}s exceeds total duration {}s",
                self.ramp_duration, self.total_duration
            )));
        }
        Ok(())
    }

    /// [`validate`](Preset::validate) plus the limits of the page's preset
    /// form. Applied to everything a user saves or imports.
    pub fn validate_user(&self) -> Result<()> {
        self.validate()?;
        let freqs = [
            ("left frequency", self.left_frequency),
            ("right start frequency", self.right_start),
            ("right end frequency", self.right_end),
        ];
        for (what, hz) in freqs {
            if hz.fract() != 0.0 || !USER_FREQUENCY_HZ.contains(&hz) {
                return Err(BinauralError::InvalidPreset(format!(
                    "{what} must be a whole number of Hz within {}..={}, got {hz}",
                    USER_FREQUENCY_HZ.start(),
                    USER_FREQUENCY_HZ.end()
                )));
            }
        }
        let durations = [
            ("ramp duration", self.ramp_duration),
            ("total duration", self.total_duration),
        ];
        for (what, secs) in durations {
            if !USER_DURATION_SECS.contains(&secs) {
                return Err(BinauralError::InvalidPreset(format!(
                    "{what} must be within {}..={}s, got {secs}s",
                    USER_DURATION_SECS.start(),
                    USER_DURATION_SECS.end()
                )));
            }
        }
        Ok(())
    }

    /// Name for lists and logs; unnamed presets fall back to their range.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}-{}Hz", self.right_start, self.right_end),
        }
    }

    /// Parse a single user preset from JSON and check it against the form
    /// limits.
    pub fn from_json(json: &str) -> Result<Self> {
        let preset: Preset = serde_json::from_str(json)?;
        preset.validate_user()?;
        Ok(preset)
    }
}

// ── Built-in presets ────────────────────────────────────────

/// The presets shipped with the page.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinPreset {
    /// 16→40 Hz beat over 20 minutes, 40 minutes total.
    Default,
    /// 12→20 Hz beat over 10 minutes, 20 minutes total.
    Focus,
    /// 4→8 Hz beat over 10 minutes, 20 minutes total.
    Relax,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 3] =
        [BuiltinPreset::Default, BuiltinPreset::Focus, BuiltinPreset::Relax];

    pub fn preset(self) -> Preset {
        match self {
            BuiltinPreset::Default => {
                Preset::new(659.0, 675.0, 699.0, 20 * 60, 40 * 60).named("Default (16-40Hz)")
            }
            BuiltinPreset::Focus => {
                Preset::new(400.0, 412.0, 420.0, 10 * 60, 20 * 60).named("Focus (12-20Hz)")
            }
            BuiltinPreset::Relax => {
                Preset::new(200.0, 204.0, 208.0, 10 * 60, 20 * 60).named("Relaxation (4-8Hz)")
            }
        }
    }
}

/// Typed preset address, resolved through [`PresetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PresetId {
    Builtin(BuiltinPreset),
    /// Index into the store's user-defined presets.
    Custom(usize),
}

impl Default for PresetId {
    fn default() -> Self {
        PresetId::Builtin(BuiltinPreset::Default)
    }
}
