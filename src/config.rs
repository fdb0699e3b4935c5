//! Player configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BinauralError, Result};

/// Tunables for a playback session. Every field has a default, so a JSON
/// config only needs the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Output sample rate of the tone engine.
    pub sample_rate: u32,
    /// Wall-clock period of the tick task in milliseconds. Each tick
    /// advances the session by one logical second whatever this is.
    pub tick_interval_ms: u32,
    /// Length of the linear gain fade on start/pause/resume/stop/volume.
    pub fade_seconds: f64,
    /// Volume a fresh session starts with, in `[0, 1]`.
    pub default_volume: f64,
    /// Minimum Hz mapped to the top of the difference chart.
    pub chart_floor_hz: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            sample_rate: 44100,
            tick_interval_ms: 1000,
            fade_seconds: 0.4,
            default_volume: 0.5,
            chart_floor_hz: 40.0,
        }
    }
}

impl PlayerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(BinauralError::InvalidConfig("sample rate must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(BinauralError::InvalidConfig("tick interval must be positive".into()));
        }
        if !self.fade_seconds.is_finite() || self.fade_seconds < 0.0 {
            return Err(BinauralError::InvalidConfig(format!(
                "fade must be a non-negative number of seconds, got {}",
                self.fade_seconds
            )));
        }
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(BinauralError::InvalidConfig(format!(
                "default volume must be within 0..1, got {}",
                self.default_volume
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }

    pub fn tick_seconds(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }

    /// Config at a different sample rate, everything else unchanged.
    pub fn with_sample_rate(self, sample_rate: u32) -> Self {
        PlayerConfig { sample_rate, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_behaviour() {
        let config = PlayerConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.fade_seconds, 0.4);
        assert_eq!(config.chart_floor_hz, 40.0);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{"sampleRate": 48000, "fadeSeconds": 0.1}"#;
        let config = PlayerConfig::from_json(json).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.fade_seconds, 0.1);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn rejects_zero_interval() {
        let err = PlayerConfig::from_json(r#"{"tickIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(err, BinauralError::InvalidConfig(_)), "got {err:?}");
    }

    #[test]
    fn rejects_volume_out_of_range() {
        let config = PlayerConfig {
            default_volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
