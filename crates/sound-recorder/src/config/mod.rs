mod device_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;
mod timing_config;

pub(crate) use {
    config::Config, device_config::DeviceConfig, storage_config::StorageConfig,
    timing_config::TimingConfig,
};

pub(crate) const DEFAULT_MONITOR_INTERVAL_MS: u64 = 250;
pub(crate) const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;
pub(crate) const DEFAULT_AMPLITUDE_CEILING: u16 = 24_000;

/// Folder created under the user's audio directory.
pub(crate) const RECORDINGS_FOLDER: &str = "SoundRecorder";

pub(crate) fn default_monitor_interval_ms() -> u64 {
    DEFAULT_MONITOR_INTERVAL_MS
}

pub(crate) fn default_progress_interval_ms() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_MS
}

pub(crate) fn default_amplitude_ceiling() -> u16 {
    DEFAULT_AMPLITUDE_CEILING
}
