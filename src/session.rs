//! Session: the command surface the page talks to.
//!
//! Resolves [`PresetId`]s through the [`PresetStore`] and forwards commands
//! to the [`PlaybackController`]. One session per page.

use crate::config::PlayerConfig;
use crate::controller::{PlaybackController, PlaybackState, StateSnapshot, TickOutcome};
use crate::error::Result;
use crate::preset::{Preset, PresetId, PresetStore};
use crate::scheduler::Scheduler;
use crate::tone::ToneEngine;

pub struct Session<E, S> {
    store: PresetStore,
    controller: PlaybackController<E, S>,
    selected: PresetId,
}

impl<E: ToneEngine, S: Scheduler> Session<E, S> {
    /// Open a session with the default built-in preset selected.
    pub fn new(engine: E, scheduler: S, config: PlayerConfig, store: PresetStore) -> Result<Self> {
        let selected = PresetId::default();
        let preset = store.get(selected)?;
        let controller = PlaybackController::new(engine, scheduler, config, preset)?;
        Ok(Session {
            store,
            controller,
            selected,
        })
    }

    pub fn controller(&self) -> &PlaybackController<E, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<E, S> {
        &mut self.controller
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    pub fn selected(&self) -> PresetId {
        self.selected
    }

    pub fn presets(&self) -> Vec<(PresetId, Preset)> {
        self.store.list()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StateSnapshot) + 'static) {
        self.controller.subscribe(listener);
    }

    pub fn select_preset(&mut self, id: PresetId) -> Result<()> {
        let preset = self.store.get(id)?;
        self.controller.select_preset(preset)?;
        self.selected = id;
        Ok(())
    }

    /// Start `id` from the beginning, selecting it.
    pub fn start(&mut self, id: PresetId) -> Result<()> {
        let preset = self.store.get(id)?;
        self.controller.start(preset)?;
        self.selected = id;
        Ok(())
    }

    /// Start the currently selected preset.
    pub fn start_selected(&mut self) -> Result<()> {
        self.start(self.selected)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.controller.pause()
    }

    pub fn resume(&mut self) -> Result<()> {
        self.controller.resume()
    }

    /// Pause while running, resume while paused: the page's single button.
    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.controller.state() {
            PlaybackState::Paused => self.controller.resume(),
            _ => self.controller.pause(),
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        self.controller.stop()
    }

    pub fn seek(&mut self, fraction: f64) {
        self.controller.seek(fraction);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.controller.set_volume(volume);
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.controller.tick()
    }

    /// Save a user preset and select it.
    pub fn add_preset(&mut self, preset: Preset) -> Result<PresetId> {
        let index = self.store.add(preset)?;
        let id = PresetId::Custom(index);
        self.select_preset(id)?;
        Ok(id)
    }

    /// Delete a user preset. If it was selected the session falls back to
    /// the default built-in; a selected preset further down the list keeps
    /// its selection under its new index.
    pub fn remove_preset(&mut self, index: usize) -> Result<Preset> {
        let removed = self.store.remove_at(index)?;
        if let PresetId::Custom(selected) = self.selected {
            if selected == index {
                self.select_preset(PresetId::default())?;
            } else if selected > index {
                self.selected = PresetId::Custom(selected - 1);
            }
        }
        Ok(removed)
    }
}
