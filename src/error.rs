use std::io;

use crate::controller::PlaybackState;

/// Every failure the core can report. None of them are fatal: the
/// controller and the store are left in their previous state.
#[derive(Debug, thiserror::Error)]
pub enum BinauralError {
    /// A preset violates its invariants; the run does not start.
    #[error("Invalid preset: {0}")]
    InvalidPreset(String),
    /// A command was issued in a state that does not accept it.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: PlaybackState,
    },
    /// A preset index that does not exist.
    #[error("Preset index {index} out of range (have {len})")]
    NotFound { index: usize, len: usize },
    /// An offline render would exceed the frame limit.
    #[error("Render of {frames} frames exceeds the limit of {limit}")]
    RenderTooLong { frames: u64, limit: u64 },
    /// PCM data too large for a RIFF header's 32-bit sizes.
    #[error("WAV data of {bytes} bytes does not fit a RIFF header")]
    WavTooLarge { bytes: u64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Preset storage error: {0}")]
    Storage(#[from] io::Error),
    #[error("Preset JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = BinauralError> = std::result::Result<T, E>;
