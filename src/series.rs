//! Binaural difference history for the line chart.
//!
//! Display-only state: the controller appends one sample per tick and
//! clears the series when a run starts or stops or the preset changes.

use serde::{Deserialize, Serialize};

/// One chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the run started.
    pub elapsed: u32,
    /// Binaural difference in Hz at that time.
    pub difference: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, elapsed: u32, difference: f64) {
        self.samples.push(Sample { elapsed, difference });
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest difference seen so far, or `None` for an empty series.
    pub fn max_difference(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.difference)
            .fold(None, |max, d| Some(max.map_or(d, |m: f64| m.max(d))))
    }

    /// Project the series onto a `width` x `height` canvas.
    ///
    /// X spans the whole session (`total` seconds). Y is scaled so that
    /// `max(largest difference, floor_hz)` touches the top edge, which keeps
    /// small beats from filling the chart.
    pub fn chart_points(
        &self,
        width: f64,
        height: f64,
        total: u32,
        floor_hz: f64,
    ) -> Vec<(f64, f64)> {
        if total == 0 {
            return Vec::new();
        }
        let scale = self.max_difference().unwrap_or(0.0).max(floor_hz);
        self.samples
            .iter()
            .map(|s| {
                let x = s.elapsed as f64 / total as f64 * width;
                let y = if scale > 0.0 {
                    height - s.difference / scale * height
                } else {
                    height
                };
                (x, y)
            })
            .collect()
    }
}
