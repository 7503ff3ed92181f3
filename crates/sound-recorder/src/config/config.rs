//! Configuration management for sound-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{DeviceConfig, RECORDINGS_FOLDER, StorageConfig, TimingConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::{ProjectDirs, UserDirs};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use sound_recorder_core::{RecordingLibrary, SessionOptions};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Library and scratch directories.
    pub storage: StorageConfig,
    /// Session loop periods.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Virtual device settings.
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Configuration with default timing and device settings.
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage,
            timing: TimingConfig::default(),
            device: DeviceConfig::default(),
        }
    }

    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `config_path`, writing defaults there if the
    /// file does not exist yet.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            info!("No config found, creating default");
            let config = Self::defaults()?;
            config.save_to(config_path)?;

            warn!(
                recordings_dir = ?config.storage.recordings_dir,
                "Default config created"
            );

            return Ok(config);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                debug!(config_dir = ?config_dir, "Created config directory");
            }
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Session tunables for the core.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions::new(&self.storage.temp_dir)
            .with_monitor_interval(self.timing.monitor_interval())
            .with_progress_interval(self.timing.progress_interval())
    }

    /// The recording library at the configured location.
    pub fn library(&self) -> RecordingLibrary {
        RecordingLibrary::new(&self.storage.recordings_dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Recordings under the user's audio folder, scratch space in the cache.
    #[track_caller]
    fn defaults() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;

        let audio_dir = UserDirs::new()
            .and_then(|dirs| dirs.audio_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| proj_dirs.data_dir().to_path_buf());

        Ok(Self::new(StorageConfig {
            recordings_dir: audio_dir.join(RECORDINGS_FOLDER),
            temp_dir: proj_dirs.cache_dir().join("captures"),
        }))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "sound-recorder", "SoundRecorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
