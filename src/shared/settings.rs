use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;

use super::error::{AppError, AppResult};
use super::types::{AngleMode, Theme};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub preferences: UserPreferences,
    pub limits: HistoryLimits,
    pub clock: ClockSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub default_angle_mode: AngleMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryLimits {
    /// Calculations kept in memory
    pub history_capacity: usize,
    /// Calculations written to the snapshot store
    pub persisted_history: usize,
    pub conversion_history: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            persisted_history: 20,
            conversion_history: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    pub stopwatch_tick_ms: u64,
    pub timer_tick_ms: u64,
    pub default_timer_seconds: u64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            stopwatch_tick_ms: 10,
            timer_tick_ms: 1000,
            default_timer_seconds: 300,
        }
    }
}

impl ClockSettings {
    pub fn stopwatch_tick(&self) -> Duration {
        Duration::from_millis(self.stopwatch_tick_ms.max(1))
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms.max(1))
    }
}

impl AppSettings {
    pub fn get_settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "calculator-widgets")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Io("Failed to determine config directory".to_string()))
    }

    /// Load settings from the default location, creating the file if needed
    pub async fn load() -> AppResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    /// Load settings from `path`
    ///
    /// A missing file is created with defaults. A file that no longer parses
    /// is left alone and the defaults are used for this session.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !fs::try_exists(path).await? {
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        match serde_json::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("[AppSettings] Failed to parse {}: {}, using defaults", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    pub async fn save(&self) -> AppResult<()> {
        let path = Self::get_settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }
}
