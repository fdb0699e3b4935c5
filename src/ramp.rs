//! Frequency ramp model.
//!
//! The right-ear tone rises linearly from `right_start` to `right_end` over
//! the ramp phase, then holds at `right_end` until the session ends.
//! Everything here is a pure function of the preset and elapsed seconds.

use crate::preset::Preset;

/// Which part of the session a point in time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampPhase {
    Ramp,
    Hold,
    /// `elapsed >= total_duration`; the controller stops here.
    Complete,
}

pub fn phase_at(preset: &Preset, elapsed: f64) -> RampPhase {
    let elapsed = elapsed.max(0.0);
    if elapsed < preset.ramp_duration as f64 {
        RampPhase::Ramp
    } else if elapsed < preset.total_duration as f64 {
        RampPhase::Hold
    } else {
        RampPhase::Complete
    }
}

/// Right-ear frequency in Hz at `elapsed` seconds.
///
/// Past the end of the session this keeps returning `right_end`; use
/// [`phase_at`] to detect completion.
pub fn frequency_at(preset: &Preset, elapsed: f64) -> f64 {
    let elapsed = elapsed.max(0.0);
    match phase_at(preset, elapsed) {
        RampPhase::Ramp => {
            let slope = (preset.right_end - preset.right_start) / preset.ramp_duration as f64;
            // Clamp absorbs floating-point overshoot near the phase boundary.
            (preset.right_start + elapsed * slope).clamp(preset.right_start, preset.right_end)
        }
        RampPhase::Hold | RampPhase::Complete => preset.right_end,
    }
}

/// The binaural beat: distance between the two ear frequencies.
pub fn difference_at(preset: &Preset, elapsed: f64) -> f64 {
    (frequency_at(preset, elapsed) - preset.left_frequency).abs()
}

/// Scrub bar position in `[0, 1]`.
pub fn progress(preset: &Preset, elapsed: f64) -> f64 {
    if preset.total_duration == 0 {
        return 1.0;
    }
    (elapsed.max(0.0) / preset.total_duration as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn example() -> Preset {
        Preset::new(659.0, 675.0, 699.0, 1200, 2400)
    }

    #[test]
    fn midpoint_of_default_ramp() {
        let p = example();
        let f = frequency_at(&p, 600.0);
        assert!((f - 687.0).abs() < 1e-9, "expected 687 Hz, got {f}");
        let d = difference_at(&p, 600.0);
        assert!((d - 28.0).abs() < 1e-9, "expected 28 Hz, got {d}");
    }

    #[test]
    fn difference_at_start() {
        let p = example();
        assert_eq!(difference_at(&p, 0.0), (p.right_start - p.left_frequency).abs());
    }

    #[test]
    fn phases() {
        let p = example();
        assert_eq!(phase_at(&p, 0.0), RampPhase::Ramp);
        assert_eq!(phase_at(&p, 1199.0), RampPhase::Ramp);
        assert_eq!(phase_at(&p, 1200.0), RampPhase::Hold);
        assert_eq!(phase_at(&p, 2399.0), RampPhase::Hold);
        assert_eq!(phase_at(&p, 2400.0), RampPhase::Complete);
    }

    #[test]
    fn complete_keeps_final_frequency() {
        let p = example();
        assert_eq!(frequency_at(&p, 5000.0), 699.0);
    }

    #[test]
    fn negative_elapsed_is_start() {
        let p = example();
        assert_eq!(frequency_at(&p, -10.0), 675.0);
        assert_eq!(progress(&p, -10.0), 0.0);
    }

    #[test]
    fn flat_ramp_holds_start() {
        let p = Preset::new(200.0, 204.0, 204.0, 60, 60);
        for t in 0..60 {
            assert_eq!(frequency_at(&p, t as f64), 204.0);
        }
    }

    #[test]
    fn left_above_right_still_positive_difference() {
        let p = Preset::new(220.0, 200.0, 210.0, 10, 20);
        assert_eq!(difference_at(&p, 0.0), 20.0);
        assert_eq!(difference_at(&p, 10.0), 10.0);
    }

    #[test]
    fn progress_caps_at_one() {
        let p = example();
        assert_eq!(progress(&p, 1200.0), 0.5);
        assert_eq!(progress(&p, 9999.0), 1.0);
    }

    fn valid_preset() -> impl Strategy<Value = Preset> {
        let ranges = (0.0..2000.0f64, 0.0..2000.0f64, 0.0..500.0f64, 1u32..7200, 0u32..7200);
        ranges.prop_map(|(left, start, span, ramp, hold)| {
            Preset::new(left, start, start + span, ramp, ramp + hold)
        })
    }

    proptest! {
        #[test]
        fn ramp_is_monotonic_and_bounded(p in valid_preset(), a in 0.0..1.0f64, b in 0.0..1.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let ramp = p.ramp_duration as f64;
            let f_lo = frequency_at(&p, lo * ramp);
            let f_hi = frequency_at(&p, hi * ramp);
            prop_assert!(f_lo <= f_hi, "{} > {} for {:?}", f_lo, f_hi, p);
            prop_assert!(f_lo >= p.right_start && f_hi <= p.right_end);
        }

        #[test]
        fn hold_phase_is_right_end(p in valid_preset(), t in 0.0..1.0f64) {
            let ramp = p.ramp_duration as f64;
            let total = p.total_duration as f64;
            let elapsed = ramp + t * (total - ramp);
            prop_assert_eq!(frequency_at(&p, elapsed), p.right_end);
        }
    }
}
