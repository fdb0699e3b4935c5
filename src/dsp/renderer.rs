//! Offline renderer: plays a whole preset through the controller into a
//! PCM buffer or a WAV byte buffer.
//!
//! Uses the same controller and synth as live playback, with a
//! [`ManualScheduler`] standing in for the browser timer, so the rendered
//! file matches what the page would have played.

use crate::config::PlayerConfig;
use crate::controller::{PlaybackController, PlaybackState};
use crate::error::{BinauralError, Result};
use crate::preset::Preset;
use crate::scheduler::ManualScheduler;

use super::synth::BinauralSynth;

/// Longest offline render, in stereo frames. The interleaved `f32` buffer
/// (8 bytes a frame) must be allocatable and the 16-bit WAV data (4 bytes a
/// frame) must fit a RIFF header.
pub const MAX_RENDER_FRAMES: u64 = {
    let addressable = isize::MAX as u64 / 8;
    let riff = (u32::MAX as u64 - 36) / 4;
    if addressable < riff { addressable } else { riff }
};

/// Frames a full render of `preset` produces: one tick interval per second
/// of the session plus the fade-out tail.
pub fn render_frame_count(preset: &Preset, config: &PlayerConfig) -> Result<u64> {
    let frames_per_tick = frames_per_tick(config);
    let tail = tail_frames(config);
    let frames = frames_per_tick
        .checked_mul(preset.total_duration as u64)
        .and_then(|f| f.checked_add(tail))
        .unwrap_or(u64::MAX);
    if frames > MAX_RENDER_FRAMES {
        return Err(BinauralError::RenderTooLong {
            frames,
            limit: MAX_RENDER_FRAMES,
        });
    }
    Ok(frames)
}

fn frames_per_tick(config: &PlayerConfig) -> u64 {
    (config.tick_seconds() * config.sample_rate as f64).round() as u64
}

fn tail_frames(config: &PlayerConfig) -> u64 {
    (config.fade_seconds * config.sample_rate as f64).round() as u64
}

/// Render `preset` from start to auto-stop plus the fade-out tail.
/// Returns interleaved stereo `f32` at `config.sample_rate`.
pub fn render_preset_samples(
    preset: &Preset,
    config: &PlayerConfig,
    volume: f64,
) -> Result<Vec<f32>> {
    preset.validate()?;
    let frames = render_frame_count(preset, config)?;
    let mut controller = PlaybackController::new(
        BinauralSynth::new(config.sample_rate as f64),
        ManualScheduler::new(),
        *config,
        preset.clone(),
    )?;
    controller.set_volume(volume);
    controller.start(preset.clone())?;

    let interval = config.tick_interval();
    let frames_per_tick = frames_per_tick(config) as usize;
    let mut output = Vec::with_capacity(frames as usize * 2);

    while controller.state() != PlaybackState::Idle {
        output.extend(controller.engine_mut().render(frames_per_tick));
        let due = controller.scheduler_mut().advance(interval);
        for _ in 0..due {
            controller.tick();
        }
    }

    output.extend(controller.engine_mut().render(tail_frames(config) as usize));
    log::info!(
        "Rendered {} ({} frames)",
        preset.display_name(),
        output.len() / 2
    );
    Ok(output)
}

/// Render `preset` to a WAV file as bytes (16-bit stereo PCM).
pub fn render_preset_wav(preset: &Preset, config: &PlayerConfig, volume: f64) -> Result<Vec<u8>> {
    let samples = render_preset_samples(preset, config, volume)?;
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    encode_wav(&pcm, config.sample_rate, 2)
}

/// RIFF `(data_size, file_size)` for `sample_count` 16-bit samples.
fn wav_sizes(sample_count: usize) -> Result<(u32, u32)> {
    let bytes = (sample_count as u64).saturating_mul(2);
    let too_large = || BinauralError::WavTooLarge { bytes };
    let data_size = u32::try_from(bytes).map_err(|_| too_large())?;
    let file_size = data_size.checked_add(36).ok_or_else(too_large)?;
    Ok((data_size, file_size))
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let (data_size, file_size) = wav_sizes(samples.len())?;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    Ok(buf)
}
