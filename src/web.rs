//! Browser bindings: a `setInterval`-backed scheduler and the
//! `BinauralPlayer` class the page drives.
//!
//! The page owns `localStorage`: it passes the stored `customPresets` JSON
//! to the constructor and writes `customPresetsJson()` back after adding or
//! removing a preset. Audio is pulled with `render(frames)` from the
//! AudioWorklet glue; state changes are polled with `takeSnapshot()`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::config::PlayerConfig;
use crate::controller::{StateSnapshot, Transition};
use crate::dsp::synth::BinauralSynth;
use crate::error::{BinauralError, Result};
use crate::preset::{BuiltinPreset, MemoryStorage, Preset, PresetId, PresetStore};
use crate::scheduler::{Scheduler, TickHandle};
use crate::session::Session;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setInterval)]
    fn set_interval(callback: &Closure<dyn FnMut()>, millis: u32) -> i32;

    #[wasm_bindgen(js_name = clearInterval)]
    fn clear_interval(id: i32);
}

// ── Scheduler ───────────────────────────────────────────────

/// The page's interval timer. `Callback` is whatever must stay alive while
/// the interval is registered.
pub trait TimerHost {
    type Callback;
    fn wrap(&self, on_tick: Rc<dyn Fn()>) -> Self::Callback;
    fn set_interval(&mut self, callback: &Self::Callback, millis: u32) -> i32;
    fn clear_interval(&mut self, id: i32);
}

/// `setInterval` / `clearInterval` on the JS global.
pub struct BrowserTimers;

impl TimerHost for BrowserTimers {
    type Callback = Closure<dyn FnMut()>;

    fn wrap(&self, on_tick: Rc<dyn Fn()>) -> Self::Callback {
        Closure::<dyn FnMut()>::new(move || on_tick())
    }

    fn set_interval(&mut self, callback: &Self::Callback, millis: u32) -> i32 {
        set_interval(callback, millis)
    }

    fn clear_interval(&mut self, id: i32) {
        clear_interval(id);
    }
}

struct IntervalTask<C> {
    interval_id: i32,
    callback: C,
}

/// Runs tick tasks on a [`TimerHost`].
pub struct IntervalScheduler<T: TimerHost> {
    host: T,
    on_tick: Rc<dyn Fn()>,
    next_id: u64,
    tasks: HashMap<TickHandle, IntervalTask<T::Callback>>,
    /// Callbacks of cancelled tasks. A task may be cancelled from inside its
    /// own callback, so its callback is only freed on the next schedule.
    retired: Vec<T::Callback>,
}

impl<T: TimerHost> IntervalScheduler<T> {
    pub fn new(host: T, on_tick: impl Fn() + 'static) -> Self {
        IntervalScheduler {
            host,
            on_tick: Rc::new(on_tick),
            next_id: 0,
            tasks: HashMap::new(),
            retired: Vec::new(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Cancelled callbacks still waiting to be freed.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }
}

impl<T: TimerHost> Scheduler for IntervalScheduler<T> {
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle {
        self.retired.clear();
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let callback = self.host.wrap(Rc::clone(&self.on_tick));
        let millis = period.as_millis().clamp(1, u32::MAX as u128) as u32;
        let interval_id = self.host.set_interval(&callback, millis);
        self.tasks.insert(
            handle,
            IntervalTask {
                interval_id,
                callback,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            self.host.clear_interval(task.interval_id);
            self.retired.push(task.callback);
        }
    }
}

impl<T: TimerHost> Drop for IntervalScheduler<T> {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            self.host.clear_interval(task.interval_id);
        }
    }
}

// ── Player ──────────────────────────────────────────────────

type SessionCell<T> = RefCell<Session<BinauralSynth, IntervalScheduler<T>>>;
type SharedSession<T> = Rc<SessionCell<T>>;

fn to_js(e: BinauralError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Build a session whose ticks arrive through `host`.
///
/// The tick callback reaches the session through a weak handle that is
/// filled in once the session exists. A tick that lands while a command
/// holds the session is dropped.
fn open_session<T: TimerHost + 'static>(
    host: T,
    config: PlayerConfig,
    store: PresetStore,
) -> Result<SharedSession<T>> {
    let target: Rc<RefCell<Weak<SessionCell<T>>>> = Rc::new(RefCell::new(Weak::new()));
    let tick_target = Rc::clone(&target);
    let scheduler = IntervalScheduler::new(host, move || {
        let Some(session) = tick_target.borrow().upgrade() else {
            return;
        };
        if let Ok(mut session) = session.try_borrow_mut() {
            session.tick();
        }
    });
    let synth = BinauralSynth::new(config.sample_rate as f64);
    let session = Rc::new(RefCell::new(Session::new(synth, scheduler, config, store)?));
    *target.borrow_mut() = Rc::downgrade(&session);
    Ok(session)
}

/// One binaural session bound to the page.
#[wasm_bindgen]
pub struct BinauralPlayer {
    session: SharedSession<BrowserTimers>,
    latest: Rc<RefCell<Option<StateSnapshot>>>,
}

#[wasm_bindgen]
impl BinauralPlayer {
    /// `custom_presets_json` is the page's stored preset array (may be empty).
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: u32, custom_presets_json: &str) -> Result<BinauralPlayer, JsValue> {
        let config = PlayerConfig::default().with_sample_rate(sample_rate);
        let storage = MemoryStorage::from_json(custom_presets_json).map_err(to_js)?;
        let store = PresetStore::open(storage).map_err(to_js)?;
        let session = open_session(BrowserTimers, config, store).map_err(to_js)?;

        // The page starts out showing the selected preset.
        let initial = session.borrow().controller().snapshot(Transition::PresetChanged);
        let latest = Rc::new(RefCell::new(Some(initial)));
        let sink = Rc::clone(&latest);
        session
            .borrow_mut()
            .subscribe(move |snapshot: &StateSnapshot| *sink.borrow_mut() = Some(snapshot.clone()));

        Ok(BinauralPlayer { session, latest })
    }

    #[wasm_bindgen(js_name = selectBuiltin)]
    pub fn select_builtin(&self, preset: BuiltinPreset) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .select_preset(PresetId::Builtin(preset))
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectCustom)]
    pub fn select_custom(&self, index: usize) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .select_preset(PresetId::Custom(index))
            .map_err(to_js)
    }

    /// Start the selected preset from the beginning.
    pub fn start(&self) -> Result<(), JsValue> {
        self.session.borrow_mut().start_selected().map_err(to_js)
    }

    pub fn pause(&self) -> Result<(), JsValue> {
        self.session.borrow_mut().pause().map_err(to_js)
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.session.borrow_mut().resume().map_err(to_js)
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) -> Result<(), JsValue> {
        self.session.borrow_mut().toggle_pause().map_err(to_js)
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        self.session.borrow_mut().stop().map_err(to_js)
    }

    pub fn seek(&self, fraction: f64) {
        self.session.borrow_mut().seek(fraction);
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.session.borrow_mut().set_volume(volume);
    }

    /// Save a preset from the page's form JSON and select it. Returns its index.
    #[wasm_bindgen(js_name = addPreset)]
    pub fn add_preset(&self, preset_json: &str) -> Result<usize, JsValue> {
        let preset = Preset::from_json(preset_json).map_err(to_js)?;
        match self.session.borrow_mut().add_preset(preset).map_err(to_js)? {
            PresetId::Custom(index) => Ok(index),
            PresetId::Builtin(_) => Err(JsValue::from_str("preset was not stored as custom")),
        }
    }

    #[wasm_bindgen(js_name = removePreset)]
    pub fn remove_preset(&self, index: usize) -> Result<(), JsValue> {
        self.session
            .borrow_mut()
            .remove_preset(index)
            .map(|_| ())
            .map_err(to_js)
    }

    /// The user presets, ready to write back to `localStorage`.
    #[wasm_bindgen(js_name = customPresetsJson)]
    pub fn custom_presets_json(&self) -> Result<String, JsValue> {
        self.session.borrow().store().custom_json().map_err(to_js)
    }

    /// Every preset as `[{ id, preset }]`, built-ins first.
    pub fn presets(&self) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        struct Entry {
            id: PresetId,
            preset: Preset,
        }
        let entries: Vec<Entry> = self
            .session
            .borrow()
            .presets()
            .into_iter()
            .map(|(id, preset)| Entry { id, preset })
            .collect();
        serde_wasm_bindgen::to_value(&entries).map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    /// Render `frames` interleaved stereo frames for the AudioWorklet.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        self.session
            .borrow_mut()
            .controller_mut()
            .engine_mut()
            .render(frames)
    }

    /// The latest state notification, or `null` if nothing changed since
    /// the last call.
    #[wasm_bindgen(js_name = takeSnapshot)]
    pub fn take_snapshot(&self) -> Result<JsValue, JsValue> {
        match self.latest.borrow_mut().take() {
            Some(snapshot) => serde_wasm_bindgen::to_value(&snapshot)
                .map_err(|e| JsValue::from_str(&format!("{e}"))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Chart polyline for a `width` x `height` canvas, flattened `[x0, y0, x1, y1, ...]`.
    #[wasm_bindgen(js_name = chartPoints)]
    pub fn chart_points(&self, width: f64, height: f64) -> Vec<f64> {
        self.session
            .borrow()
            .controller()
            .chart_points(width, height)
            .into_iter()
            .flat_map(|(x, y)| [x, y])
            .collect()
    }
}
