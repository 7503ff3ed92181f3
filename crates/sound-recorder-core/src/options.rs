use std::{path::PathBuf, time::Duration};

/// Default sampling period of the recording monitor loop.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_millis(250);

/// Default sampling period of the playback progress loop.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

// tokio's interval rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tunables shared by the recording and playback sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub(crate) temp_dir: PathBuf,
    pub(crate) monitor_interval: Duration,
    pub(crate) progress_interval: Duration,
}

impl SessionOptions {
    /// Options with default tick intervals and in-progress captures written
    /// under `temp_dir`.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Override the recording monitor period.
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Override the playback progress period.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Directory in-progress captures are written to.
    pub fn temp_dir(&self) -> &std::path::Path {
        &self.temp_dir
    }
}
