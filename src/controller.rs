//! Playback controller: the session state machine.
//!
//! `Idle → Running → {Paused ⇄ Running} → Idle`. The controller owns the
//! playback clock, the tick task and the difference series. Every command
//! pushes the resulting frequency to the [`ToneEngine`] and notifies
//! listeners with a [`StateSnapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::display::{format_hz, format_time};
use crate::error::{BinauralError, Result};
use crate::preset::Preset;
use crate::ramp::{self, RampPhase};
use crate::scheduler::{Scheduler, TickHandle};
use crate::series::{Sample, SampleSeries};
use crate::tone::{Channel, ToneEngine};

// ── State ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Running => write!(f, "running"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// Elapsed seconds plus run flags. `paused` implies `running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackClock {
    pub elapsed: u32,
    pub running: bool,
    pub paused: bool,
}

impl PlaybackClock {
    pub fn state(&self) -> PlaybackState {
        match (self.running, self.paused) {
            (false, _) => PlaybackState::Idle,
            (true, false) => PlaybackState::Running,
            (true, true) => PlaybackState::Paused,
        }
    }
}

/// What caused a state notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    PresetChanged,
    Started,
    Ticked,
    Paused,
    Resumed,
    Stopped,
    /// The run reached its total duration and stopped itself.
    Completed,
    Seeked,
    VolumeChanged,
}

/// Everything the page needs to redraw after a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub state: PlaybackState,
    pub transition: Transition,
    pub elapsed: u32,
    pub total: u32,
    /// Right-ear frequency in Hz.
    pub frequency: f64,
    /// Binaural difference in Hz.
    pub difference: f64,
    /// Scrub bar position in `[0, 1]`.
    pub progress: f64,
    pub volume: f64,
    pub elapsed_label: String,
    pub total_label: String,
    pub series: Vec<Sample>,
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or paused; nothing changed.
    Ignored,
    Advanced,
    /// Reached the total duration; the controller is Idle again.
    Completed,
}

pub type Listener = Box<dyn FnMut(&StateSnapshot)>;

// ── Controller ──────────────────────────────────────────────

pub struct PlaybackController<E, S> {
    engine: E,
    scheduler: S,
    config: PlayerConfig,
    preset: Preset,
    clock: PlaybackClock,
    series: SampleSeries,
    volume: f64,
    /// The one live tick task, if any.
    tick_task: Option<TickHandle>,
    listeners: Vec<Listener>,
}

impl<E: ToneEngine, S: Scheduler> PlaybackController<E, S> {
    pub fn new(engine: E, scheduler: S, config: PlayerConfig, preset: Preset) -> Result<Self> {
        config.validate()?;
        preset.validate()?;
        Ok(PlaybackController {
            engine,
            scheduler,
            volume: config.default_volume,
            config,
            preset,
            clock: PlaybackClock::default(),
            series: SampleSeries::new(),
            tick_task: None,
            listeners: Vec::new(),
        })
    }

    /// Register a listener for state notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(&StateSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn clock(&self) -> PlaybackClock {
        self.clock
    }

    pub fn elapsed(&self) -> u32 {
        self.clock.elapsed
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Right-ear frequency for the current clock.
    pub fn frequency(&self) -> f64 {
        ramp::frequency_at(&self.preset, self.clock.elapsed as f64)
    }

    pub fn difference(&self) -> f64 {
        ramp::difference_at(&self.preset, self.clock.elapsed as f64)
    }

    pub fn snapshot(&self, transition: Transition) -> StateSnapshot {
        let elapsed = self.clock.elapsed;
        StateSnapshot {
            state: self.state(),
            transition,
            elapsed,
            total: self.preset.total_duration,
            frequency: self.frequency(),
            difference: self.difference(),
            progress: ramp::progress(&self.preset, elapsed as f64),
            volume: self.volume,
            elapsed_label: format_time(elapsed),
            total_label: format_time(self.preset.total_duration),
            series: self.series.samples().to_vec(),
        }
    }

    /// Chart coordinates for the current series.
    pub fn chart_points(&self, width: f64, height: f64) -> Vec<(f64, f64)> {
        self.series.chart_points(
            width,
            height,
            self.preset.total_duration,
            self.config.chart_floor_hz,
        )
    }

    // ── Commands ────────────────────────────────────────────

    /// Switch presets. An active run is stopped first; the clock and the
    /// series are reset.
    pub fn select_preset(&mut self, preset: Preset) -> Result<()> {
        preset.validate()?;
        if self.clock.running {
            self.halt();
        }
        log::info!("Selected preset {}", preset.display_name());
        self.preset = preset;
        self.clock = PlaybackClock::default();
        self.series.clear();
        self.push_frequency();
        self.notify(Transition::PresetChanged);
        Ok(())
    }

    /// Start a run of `preset` from the beginning. Valid in any state; a run
    /// already in progress is replaced.
    pub fn start(&mut self, preset: Preset) -> Result<()> {
        preset.validate()?;
        self.cancel_tick();
        log::info!(
            "Starting {} ({}s ramp, {}s total)",
            preset.display_name(),
            preset.ramp_duration,
            preset.total_duration
        );
        self.preset = preset;
        self.clock = PlaybackClock {
            elapsed: 0,
            running: true,
            paused: false,
        };
        self.series.clear();

        self.engine
            .start_tones(self.preset.left_frequency, self.preset.right_start);
        self.fade_to(self.volume);
        self.schedule_tick();
        self.notify(Transition::Started);
        Ok(())
    }

    /// Advance the clock by one second. Only effective while running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state() != PlaybackState::Running {
            return TickOutcome::Ignored;
        }
        let total = self.preset.total_duration;
        let ramping = ramp::phase_at(&self.preset, self.clock.elapsed as f64) == RampPhase::Ramp;
        self.clock.elapsed = (self.clock.elapsed + 1).min(total);
        let elapsed = self.clock.elapsed;

        let frequency = self.frequency();
        let difference = self.difference();
        // Glide across the tick while ramping; hold values are set directly.
        let glide = ramping.then(|| self.config.tick_seconds());
        self.engine.set_frequency(Channel::Right, frequency, glide);
        self.series.push(elapsed, difference);
        log::debug!(
            "tick {elapsed}/{total}s: right {} Hz, beat {} Hz",
            format_hz(frequency),
            format_hz(difference)
        );

        if elapsed >= total {
            self.complete();
            TickOutcome::Completed
        } else {
            self.notify(Transition::Ticked);
            TickOutcome::Advanced
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        self.expect_state(PlaybackState::Running, "pause")?;
        self.cancel_tick();
        self.clock.paused = true;
        self.push_frequency();
        self.fade_to(0.0);
        log::info!("Paused at {}s", self.clock.elapsed);
        self.notify(Transition::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.expect_state(PlaybackState::Paused, "resume")?;
        self.clock.paused = false;
        self.push_frequency();
        self.fade_to(self.volume);
        self.schedule_tick();
        log::info!("Resumed at {}s", self.clock.elapsed);
        self.notify(Transition::Resumed);
        Ok(())
    }

    /// Stop the run and rewind to the start of the preset.
    pub fn stop(&mut self) -> Result<()> {
        if !self.clock.running {
            return Err(self.reject("stop"));
        }
        self.halt();
        self.clock = PlaybackClock::default();
        self.series.clear();
        self.push_frequency();
        log::info!("Stopped");
        self.notify(Transition::Stopped);
        Ok(())
    }

    /// Jump to `fraction` of the session. Running/paused flags are kept and
    /// the new frequency is applied immediately.
    pub fn seek(&mut self, fraction: f64) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let total = self.preset.total_duration;
        self.clock.elapsed = ((fraction * total as f64).round() as u32).min(total);
        self.push_frequency();
        log::debug!("Seek to {}s", self.clock.elapsed);
        self.notify(Transition::Seeked);
    }

    /// Set the output volume, clamped to `[0, 1]`. Audible immediately
    /// (with a fade) while running; otherwise used on the next start/resume.
    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            log::warn!("Ignoring non-finite volume {volume}");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if self.state() == PlaybackState::Running {
            self.fade_to(self.volume);
        }
        self.notify(Transition::VolumeChanged);
    }

    // ── Internals ───────────────────────────────────────────

    /// Auto-stop at the end of the session. The final notification still
    /// carries the finished run's series; it is cleared afterwards.
    fn complete(&mut self) {
        self.halt();
        self.clock = PlaybackClock::default();
        log::info!("Completed {}", self.preset.display_name());
        self.notify(Transition::Completed);
        self.series.clear();
    }

    /// Cancel the tick and fade the tones out. Leaves the clock alone.
    fn halt(&mut self) {
        self.cancel_tick();
        self.fade_to(0.0);
        let stop_at = self.engine.current_time() + self.config.fade_seconds;
        self.engine.stop_tones(stop_at);
    }

    /// Set the right ear to the clock's frequency without a glide.
    fn push_frequency(&mut self) {
        let frequency = self.frequency();
        self.engine.set_frequency(Channel::Right, frequency, None);
    }

    fn fade_to(&mut self, gain: f64) {
        let fade = Some(self.config.fade_seconds);
        for channel in Channel::BOTH {
            self.engine.set_gain(channel, gain, fade);
        }
    }

    fn schedule_tick(&mut self) {
        self.cancel_tick();
        let handle = self.scheduler.schedule_repeating(self.config.tick_interval());
        self.tick_task = Some(handle);
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick_task.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn expect_state(&self, expected: PlaybackState, action: &'static str) -> Result<()> {
        if self.state() == expected {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    fn reject(&self, action: &'static str) -> BinauralError {
        let state = self.state();
        log::warn!("Rejected {action} while {state}");
        BinauralError::InvalidTransition { action, state }
    }

    fn notify(&mut self, transition: Transition) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot(transition);
        for listener in self.listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use crate::dsp::synth::BinauralSynth;
    use crate::scheduler::ManualScheduler;

    type TestController = PlaybackController<BinauralSynth, ManualScheduler>;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn example() -> Preset {
        Preset::new(659.0, 675.0, 699.0, 1200, 2400)
    }

    fn short() -> Preset {
        Preset::new(200.0, 204.0, 208.0, 4, 8).named("short")
    }

    fn controller(preset: Preset) -> TestController {
        init_logging();
        PlaybackController::new(
            BinauralSynth::new(1000.0),
            ManualScheduler::new(),
            PlayerConfig::default().with_sample_rate(1000),
            preset,
        )
        .unwrap()
    }

    fn recorder(ctl: &mut TestController) -> Rc<RefCell<Vec<StateSnapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        ctl.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        seen
    }

    #[test]
    fn new_rejects_invalid_preset() {
        let result = PlaybackController::new(
            BinauralSynth::new(1000.0),
            ManualScheduler::new(),
            PlayerConfig::default(),
            Preset::new(200.0, 210.0, 205.0, 10, 20),
        );
        assert!(matches!(result, Err(BinauralError::InvalidPreset(_))));
    }

    #[test]
    fn starts_idle_at_zero() {
        let ctl = controller(example());
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.elapsed(), 0);
        assert_eq!(ctl.frequency(), 675.0);
        assert_eq!(ctl.difference(), 16.0);
    }

    #[test]
    fn start_runs_tones_and_schedules_one_tick() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();

        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.scheduler().active_count(), 1);
        assert!(ctl.engine().is_active());
        assert_eq!(ctl.engine().target_frequency(Channel::Left), 659.0);
        assert_eq!(ctl.engine().target_frequency(Channel::Right), 675.0);
        assert_eq!(ctl.engine().target_gain(Channel::Left), ctl.volume());
    }

    #[test]
    fn ticks_follow_the_ramp() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        for _ in 0..600 {
            assert_eq!(ctl.tick(), TickOutcome::Advanced);
        }
        assert_eq!(ctl.elapsed(), 600);
        assert!((ctl.frequency() - 687.0).abs() < 1e-9);
        assert!((ctl.difference() - 28.0).abs() < 1e-9);
        assert!((ctl.engine().target_frequency(Channel::Right) - 687.0).abs() < 1e-9);
        assert_eq!(ctl.series().len(), 600);
    }

    #[test]
    fn full_run_completes_into_idle() {
        let mut ctl = controller(short());
        ctl.start(short()).unwrap();
        let total = short().total_duration;
        for i in 1..total {
            assert_eq!(ctl.tick(), TickOutcome::Advanced, "tick {i}");
        }
        assert_eq!(ctl.tick(), TickOutcome::Completed);

        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.elapsed(), 0);
        assert_eq!(ctl.scheduler().active_count(), 0);
        assert_eq!(ctl.engine().target_gain(Channel::Right), 0.0);
        assert!(ctl.engine().scheduled_stop().is_some());
        assert_eq!(ctl.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn completion_snapshot_carries_finished_series() {
        let mut ctl = controller(short());
        let seen = recorder(&mut ctl);
        ctl.start(short()).unwrap();
        while ctl.tick() != TickOutcome::Completed {}

        let seen = seen.borrow();
        let last = seen.last().unwrap();
        assert_eq!(last.transition, Transition::Completed);
        assert_eq!(last.state, PlaybackState::Idle);
        assert_eq!(last.elapsed, 0);
        assert_eq!(last.series.len(), 8);
        assert_eq!(last.series[7].difference, 8.0);
        assert!(ctl.series().is_empty());
    }

    #[test]
    fn tick_ignored_while_idle_or_paused() {
        let mut ctl = controller(short());
        assert_eq!(ctl.tick(), TickOutcome::Ignored);
        ctl.start(short()).unwrap();
        ctl.pause().unwrap();
        assert_eq!(ctl.tick(), TickOutcome::Ignored);
        assert_eq!(ctl.elapsed(), 0);
    }

    #[test]
    fn pause_resume_keeps_elapsed() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        for _ in 0..42 {
            ctl.tick();
        }
        ctl.pause().unwrap();
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert_eq!(ctl.scheduler().active_count(), 0);
        assert_eq!(ctl.engine().target_gain(Channel::Left), 0.0);

        ctl.resume().unwrap();
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.elapsed(), 42);
        assert_eq!(ctl.scheduler().active_count(), 1);
        assert_eq!(ctl.engine().target_gain(Channel::Left), ctl.volume());
    }

    #[test]
    fn invalid_transitions_leave_state_alone() {
        let mut ctl = controller(short());
        let err = ctl.pause().unwrap_err();
        assert!(matches!(
            err,
            BinauralError::InvalidTransition { action: "pause", state: PlaybackState::Idle }
        ));
        assert!(ctl.resume().is_err());
        assert!(ctl.stop().is_err());
        assert_eq!(ctl.state(), PlaybackState::Idle);

        ctl.start(short()).unwrap();
        ctl.tick();
        assert!(ctl.resume().is_err(), "resume is only valid while paused");
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.elapsed(), 1);

        ctl.pause().unwrap();
        assert!(ctl.pause().is_err());
        assert_eq!(ctl.state(), PlaybackState::Paused);
    }

    #[test]
    fn invalid_transition_message() {
        let mut ctl = controller(short());
        let err = ctl.pause().unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause while idle");
    }

    #[test]
    fn stop_rewinds_and_cancels() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        for _ in 0..10 {
            ctl.tick();
        }
        ctl.stop().unwrap();
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.elapsed(), 0);
        assert!(ctl.series().is_empty());
        assert_eq!(ctl.scheduler().active_count(), 0);
        assert_eq!(ctl.engine().target_gain(Channel::Right), 0.0);
    }

    #[test]
    fn transitions_retarget_right_ear() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        for _ in 0..600 {
            ctl.tick();
        }
        ctl.pause().unwrap();
        ctl.resume().unwrap();
        assert!((ctl.engine().target_frequency(Channel::Right) - 687.0).abs() < 1e-9);

        ctl.stop().unwrap();
        assert_eq!(ctl.engine().target_frequency(Channel::Right), 675.0, "rewound with the clock");

        ctl.select_preset(short()).unwrap();
        assert_eq!(ctl.engine().target_frequency(Channel::Right), 204.0);
    }

    #[test]
    fn stop_from_paused() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        ctl.pause().unwrap();
        ctl.stop().unwrap();
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }

    #[test]
    fn restart_replaces_pending_tick() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        ctl.tick();
        ctl.start(example()).unwrap();

        assert_eq!(ctl.elapsed(), 0);
        assert_eq!(ctl.scheduler().active_count(), 1);
        assert_eq!(ctl.scheduler().scheduled_total(), 2);
    }

    #[test]
    fn failed_start_keeps_current_run() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        ctl.tick();
        let bad = Preset::new(200.0, 204.0, 208.0, 30, 10);
        assert!(ctl.start(bad).is_err());
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.elapsed(), 1);
        assert_eq!(ctl.preset(), &example());
    }

    #[test]
    fn seek_rounds_and_keeps_flags() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        ctl.pause().unwrap();

        ctl.seek(0.3337);
        assert_eq!(ctl.elapsed(), 801);
        assert_eq!(ctl.state(), PlaybackState::Paused);

        ctl.seek(0.25);
        assert_eq!(ctl.elapsed(), 600);
        assert!((ctl.engine().target_frequency(Channel::Right) - 687.0).abs() < 1e-9);
    }

    #[test]
    fn seek_clamps_out_of_range() {
        let mut ctl = controller(example());
        ctl.seek(1.5);
        assert_eq!(ctl.elapsed(), 2400);
        ctl.seek(-0.2);
        assert_eq!(ctl.elapsed(), 0);
        ctl.seek(f64::NAN);
        assert_eq!(ctl.elapsed(), 0);
    }

    #[test]
    fn seek_to_end_completes_on_next_tick() {
        let mut ctl = controller(short());
        ctl.start(short()).unwrap();
        ctl.seek(1.0);
        assert_eq!(ctl.state(), PlaybackState::Running);
        assert_eq!(ctl.tick(), TickOutcome::Completed);
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }

    #[test]
    fn select_preset_stops_active_run() {
        let mut ctl = controller(example());
        ctl.start(example()).unwrap();
        ctl.tick();
        ctl.select_preset(short()).unwrap();

        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.elapsed(), 0);
        assert!(ctl.series().is_empty());
        assert_eq!(ctl.scheduler().active_count(), 0);
        assert_eq!(ctl.preset().name.as_deref(), Some("short"));
        assert_eq!(ctl.frequency(), 204.0);
    }

    #[test]
    fn volume_is_clamped_and_faded_while_running() {
        let mut ctl = controller(example());
        ctl.set_volume(2.0);
        assert_eq!(ctl.volume(), 1.0);
        assert_eq!(ctl.engine().target_gain(Channel::Left), 0.0, "idle: not applied yet");

        ctl.start(example()).unwrap();
        ctl.set_volume(0.3);
        assert_eq!(ctl.engine().target_gain(Channel::Left), 0.3);
        assert_eq!(ctl.engine().target_gain(Channel::Right), 0.3);

        ctl.pause().unwrap();
        ctl.set_volume(0.6);
        assert_eq!(ctl.engine().target_gain(Channel::Left), 0.0, "paused stays silent");
        ctl.resume().unwrap();
        assert_eq!(ctl.engine().target_gain(Channel::Left), 0.6);

        ctl.set_volume(f64::NAN);
        assert_eq!(ctl.volume(), 0.6);
    }

    #[test]
    fn listeners_see_every_transition() {
        let mut ctl = controller(short());
        let seen = recorder(&mut ctl);
        ctl.start(short()).unwrap();
        ctl.tick();
        ctl.pause().unwrap();
        ctl.resume().unwrap();
        ctl.seek(0.5);
        ctl.set_volume(0.2);
        ctl.stop().unwrap();
        let _ = ctl.stop();

        let transitions: Vec<Transition> = seen.borrow().iter().map(|s| s.transition).collect();
        assert_eq!(
            transitions,
            vec![
                Transition::Started,
                Transition::Ticked,
                Transition::Paused,
                Transition::Resumed,
                Transition::Seeked,
                Transition::VolumeChanged,
                Transition::Stopped,
            ]
        );
    }

    #[test]
    fn snapshot_labels_and_progress() {
        let mut ctl = controller(example());
        ctl.seek(0.25);
        let snap = ctl.snapshot(Transition::Seeked);
        assert_eq!(snap.elapsed_label, "10:00");
        assert_eq!(snap.total_label, "40:00");
        assert_eq!(snap.progress, 0.25);
        assert!((snap.difference - 28.0).abs() < 1e-9);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["elapsedLabel"], "10:00");
        assert_eq!(json["state"], "idle");
        assert_eq!(json["transition"], "seeked");
    }

    #[test]
    fn chart_points_cover_the_run() {
        let mut ctl = controller(short());
        ctl.start(short()).unwrap();
        for _ in 0..4 {
            ctl.tick();
        }
        let points = ctl.chart_points(80.0, 40.0);
        assert_eq!(points.len(), 4);
        assert_eq!(points[3].0, 40.0);
        // 8 Hz beat on a 40 Hz floor.
        assert!((points[3].1 - 32.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn seek_lands_on_rounded_second(fraction in 0.0..=1.0f64, total in 1u32..20_000) {
            let mut ctl = controller(Preset::new(100.0, 104.0, 108.0, total, total));
            ctl.seek(fraction);
            prop_assert_eq!(ctl.elapsed(), (fraction * total as f64).round() as u32);
        }
    }
}
