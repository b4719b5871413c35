use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::WeatherSnapshot;

/// Persisted user state. Missing fields fall back to defaults so older files
/// keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub location: String,
    pub last_weather: Option<WeatherSnapshot>,
    pub auto_inject: bool,
    /// Epoch milliseconds of the last successful fetch, `0` if none.
    pub last_fetch_time: i64,
    pub use_celsius: bool,
}

/// Where settings go after every mutation. Implementations may coalesce writes.
pub trait SettingsStore: Send + Sync {
    fn save_debounced(&self, settings: &Settings);
}

/// JSON file store. Writes are synchronous and failures are logged, not returned.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load settings, or defaults on first run.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn save_debounced(&self, settings: &Settings) {
        if let Err(e) = self.save(settings) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }
}
