//! Phase-accumulating sine oscillator.

use std::f64::consts::PI;

/// A sine oscillator whose frequency is supplied per sample, so a gliding
/// frequency stays phase-continuous.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: f64,
    sample_rate: f64,
}

impl SineOscillator {
    pub fn new(sample_rate: f64) -> Self {
        SineOscillator {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Generate the next sample at `frequency` Hz.
    pub fn next_sample(&mut self, frequency: f64) -> f64 {
        let sample = (2.0 * PI * self.phase).sin();

        self.phase += frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        sample
    }

    /// Reset oscillator phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
