//! Binaural synth: two hard-panned sine tones rendered in Rust.
//!
//! This is the [`ToneEngine`] used both in the browser (an AudioWorklet pulls
//! interleaved stereo blocks through [`BinauralSynth::render`]) and by the
//! offline renderer. Its clock counts rendered frames, so scheduled stops
//! land on exact sample offsets.

use crate::tone::{Channel, ToneEngine};

use super::oscillator::SineOscillator;
use super::param::LinearParam;

/// Equal-power pan law: `pan` in `[-1, 1]` → `(left, right)` gains.
pub fn pan_gains(pan: f64) -> (f64, f64) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * std::f64::consts::FRAC_PI_4;
    (angle.cos(), angle.sin())
}

/// One ear's generator.
#[derive(Debug, Clone)]
struct ToneVoice {
    oscillator: SineOscillator,
    frequency: LinearParam,
    gain: LinearParam,
    pan: (f64, f64),
}

impl ToneVoice {
    fn new(channel: Channel, sample_rate: f64) -> Self {
        ToneVoice {
            oscillator: SineOscillator::new(sample_rate),
            frequency: LinearParam::new(0.0),
            gain: LinearParam::new(0.0),
            pan: pan_gains(channel.pan()),
        }
    }

    fn next_frame(&mut self) -> (f64, f64) {
        let freq = self.frequency.next_value();
        let gain = self.gain.next_value();
        let s = self.oscillator.next_sample(freq) * gain;
        (s * self.pan.0, s * self.pan.1)
    }
}

#[derive(Debug, Clone)]
pub struct BinauralSynth {
    sample_rate: f64,
    voices: [ToneVoice; 2],
    frames_rendered: u64,
    playing: bool,
    stop_at_frame: Option<u64>,
}

impl BinauralSynth {
    pub fn new(sample_rate: f64) -> Self {
        BinauralSynth {
            sample_rate,
            voices: [
                ToneVoice::new(Channel::Left, sample_rate),
                ToneVoice::new(Channel::Right, sample_rate),
            ],
            frames_rendered: 0,
            playing: false,
            stop_at_frame: None,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Where a channel's frequency is heading (or sits, when not gliding).
    pub fn target_frequency(&self, channel: Channel) -> f64 {
        self.voices[channel.index()].frequency.target()
    }

    pub fn target_gain(&self, channel: Channel) -> f64 {
        self.voices[channel.index()].gain.target()
    }

    pub fn current_gain(&self, channel: Channel) -> f64 {
        self.voices[channel.index()].gain.value()
    }

    /// Engine time at which a pending stop takes effect.
    pub fn scheduled_stop(&self) -> Option<f64> {
        self.stop_at_frame.map(|f| f as f64 / self.sample_rate)
    }

    /// Render `frames` stereo frames, interleaved `[l, r, l, r, ...]`.
    /// Silence while stopped; the clock advances either way.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(frames * 2);
        for _ in 0..frames {
            if let Some(stop) = self.stop_at_frame {
                if self.frames_rendered >= stop {
                    self.halt();
                }
            }
            let (mut l, mut r) = (0.0, 0.0);
            if self.playing {
                for voice in self.voices.iter_mut() {
                    let (vl, vr) = voice.next_frame();
                    l += vl;
                    r += vr;
                }
            }
            out.push(l as f32);
            out.push(r as f32);
            self.frames_rendered += 1;
        }
        out
    }

    fn halt(&mut self) {
        self.playing = false;
        self.stop_at_frame = None;
        for voice in self.voices.iter_mut() {
            voice.gain.set(0.0);
        }
    }

    fn seconds_to_frames(&self, seconds: f64) -> usize {
        (seconds.max(0.0) * self.sample_rate).round() as usize
    }
}

impl ToneEngine for BinauralSynth {
    fn start_tones(&mut self, left_hz: f64, right_hz: f64) {
        self.stop_at_frame = None;
        self.playing = true;
        for (voice, hz) in self.voices.iter_mut().zip([left_hz, right_hz]) {
            voice.oscillator.reset();
            voice.frequency.set(hz);
            voice.gain.set(0.0);
        }
    }

    fn stop_tones(&mut self, at: f64) {
        if !self.playing {
            return;
        }
        let frame = (at.max(0.0) * self.sample_rate).round() as u64;
        if frame <= self.frames_rendered {
            self.halt();
        } else {
            self.stop_at_frame = Some(frame);
        }
    }

    fn set_frequency(&mut self, channel: Channel, hz: f64, glide: Option<f64>) {
        let samples = glide.map_or(0, |s| self.seconds_to_frames(s));
        self.voices[channel.index()].frequency.ramp_to(hz, samples);
    }

    fn set_gain(&mut self, channel: Channel, gain: f64, fade: Option<f64>) {
        let samples = fade.map_or(0, |s| self.seconds_to_frames(s));
        self.voices[channel.index()].gain.ramp_to(gain.clamp(0.0, 1.0), samples);
    }

    fn current_time(&self) -> f64 {
        self.frames_rendered as f64 / self.sample_rate
    }

    fn is_active(&self) -> bool {
        self.playing
    }
}
