use crate::config::{
    DEFAULT_MONITOR_INTERVAL_MS, DEFAULT_PROGRESS_INTERVAL_MS, default_monitor_interval_ms,
    default_progress_interval_ms,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling periods of the session loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Amplitude and elapsed-time sampling period while recording.
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,

    /// Play head polling period while playing.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
}

impl TimingConfig {
    pub(crate) fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    pub(crate) fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            monitor_interval_ms: DEFAULT_MONITOR_INTERVAL_MS,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }
}
