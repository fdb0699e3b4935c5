//! Preset store: built-in presets plus a flat list of user presets.
//!
//! The user list is persisted through a [`PresetStorage`] after every
//! mutation. The browser keeps it in `localStorage`, so there the page hands
//! the JSON over at startup and reads it back after changes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{BinauralError, Result};

use super::{BuiltinPreset, Preset, PresetId};

/// Where user presets live between sessions.
pub trait PresetStorage {
    fn load(&self) -> Result<Vec<Preset>>;
    fn save(&mut self, presets: &[Preset]) -> Result<()>;
}

/// Keeps presets in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    presets: Vec<Preset>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the JSON array the page keeps under `customPresets`.
    /// An empty string counts as an empty list.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(MemoryStorage {
            presets: serde_json::from_str(json)?,
        })
    }
}

impl PresetStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Preset>> {
        Ok(self.presets.clone())
    }

    fn save(&mut self, presets: &[Preset]) -> Result<()> {
        self.presets = presets.to_vec();
        Ok(())
    }
}

/// Stores presets as a pretty-printed JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    /// `custom_presets.json` in the per-user data directory.
    #[cfg(feature = "storage")]
    pub fn default_location() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("net", "binaural", "binaural-core")?;
        Some(Self::new(dirs.data_dir().join("custom_presets.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PresetStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Preset>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, presets: &[Preset]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(presets)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

// ── Store ───────────────────────────────────────────────────

/// Built-in presets followed by user presets, addressed by [`PresetId`].
pub struct PresetStore {
    custom: Vec<Preset>,
    storage: Box<dyn PresetStorage>,
}

impl PresetStore {
    /// Open a store over `storage`. Stored presets outside the form limits
    /// are skipped rather than failing the whole load.
    pub fn open(storage: impl PresetStorage + 'static) -> Result<Self> {
        let loaded = storage.load()?;
        let total = loaded.len();
        let custom: Vec<Preset> = loaded
            .into_iter()
            .filter(|p| match p.validate_user() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Skipping stored preset {:?}: {e}", p.display_name());
                    false
                }
            })
            .collect();
        log::debug!("Loaded {} of {total} custom presets", custom.len());
        Ok(PresetStore {
            custom,
            storage: Box::new(storage),
        })
    }

    /// A store with no user presets and no persistence.
    pub fn in_memory() -> Self {
        PresetStore {
            custom: Vec::new(),
            storage: Box::new(MemoryStorage::new()),
        }
    }

    /// Every preset in display order: built-ins first, then user presets.
    pub fn list(&self) -> Vec<(PresetId, Preset)> {
        BuiltinPreset::ALL
            .iter()
            .map(|&b| (PresetId::Builtin(b), b.preset()))
            .chain(
                self.custom
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (PresetId::Custom(i), p.clone())),
            )
            .collect()
    }

    /// User presets only.
    pub fn custom(&self) -> &[Preset] {
        &self.custom
    }

    pub fn get(&self, id: PresetId) -> Result<Preset> {
        match id {
            PresetId::Builtin(b) => Ok(b.preset()),
            PresetId::Custom(index) => {
                self.custom
                    .get(index)
                    .cloned()
                    .ok_or(BinauralError::NotFound {
                        index,
                        len: self.custom.len(),
                    })
            }
        }
    }

    /// Check against the form limits, append and persist a user preset.
    /// Returns its index.
    pub fn add(&mut self, preset: Preset) -> Result<usize> {
        preset.validate_user()?;
        self.custom.push(preset);
        if let Err(e) = self.storage.save(&self.custom) {
            self.custom.pop();
            return Err(e);
        }
        let index = self.custom.len() - 1;
        log::info!("Added custom preset #{index}");
        Ok(index)
    }

    /// Remove and persist. Fails with `NotFound` when `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Result<Preset> {
        if index >= self.custom.len() {
            return Err(BinauralError::NotFound {
                index,
                len: self.custom.len(),
            });
        }
        let removed = self.custom.remove(index);
        if let Err(e) = self.storage.save(&self.custom) {
            self.custom.insert(index, removed);
            return Err(e);
        }
        log::info!("Removed custom preset #{index}");
        Ok(removed)
    }

    /// The user presets in their storage JSON form.
    pub fn custom_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.custom)?)
    }
}
