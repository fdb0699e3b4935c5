//! Linearly ramped audio parameter (gain fades, frequency glides).

/// A value that moves linearly towards a target over a fixed number of
/// samples, then holds.
#[derive(Debug, Clone)]
pub struct LinearParam {
    value: f64,
    target: f64,
    step: f64,
    /// Samples left until `target` is reached.
    remaining: usize,
}

impl LinearParam {
    pub fn new(value: f64) -> Self {
        LinearParam {
            value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Jump to `value` now, cancelling any ramp in progress.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    /// Ramp from the current value to `target` over `samples` samples.
    pub fn ramp_to(&mut self, target: f64, samples: usize) {
        if samples == 0 {
            self.set(target);
            return;
        }
        self.target = target;
        self.step = (target - self.value) / samples as f64;
        self.remaining = samples;
    }

    /// Advance one sample and return the value for that sample.
    pub fn next_value(&mut self) -> f64 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.value = self.target;
            } else {
                self.value += self.step;
            }
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}
