use crate::virtual_device::decode_header;

use sound_recorder_core::{
    CompletionCallback, CoreResult, PlaybackBackend, PlaybackDevice, RecorderError,
};

use std::{fs, panic::Location, path::Path, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::{runtime::Handle, task::JoinHandle, time::Instant};
use tracing::debug;

/// Playback backend for files written by [`super::VirtualCapture`].
///
/// The play head advances on the Tokio clock; end of media fires the
/// completion callback from a timer task.
pub(crate) struct VirtualPlayer;

impl PlaybackBackend for VirtualPlayer {
    #[track_caller]
    fn load(&self, path: &Path) -> CoreResult<Box<dyn PlaybackDevice>> {
        let contents = fs::read_to_string(path).map_err(|e| RecorderError::LoadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let duration = decode_header(&contents).ok_or_else(|| RecorderError::LoadError {
            path: path.to_path_buf(),
            reason: "Not a virtual recording".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(path = ?path, duration_ms = duration.as_millis(), "Virtual media loaded");

        Ok(Box::new(VirtualPlaybackDevice {
            duration,
            offset: Duration::ZERO,
            started_at: None,
            completion: None,
            timer: None,
        }))
    }
}

/// Play head is `offset` plus time since `started_at` while running.
struct VirtualPlaybackDevice {
    duration: Duration,
    offset: Duration,
    started_at: Option<Instant>,
    completion: Option<Arc<dyn Fn() + Send + Sync>>,
    timer: Option<JoinHandle<()>>,
}

impl VirtualPlaybackDevice {
    fn position(&self) -> Duration {
        let position = match self.started_at {
            Some(started_at) => self.offset + started_at.elapsed(),
            None => self.offset,
        };
        position.min(self.duration)
    }

    /// Fold a run that reached the end back into the stopped state.
    fn settle(&mut self) {
        if self.started_at.is_some() && self.position() >= self.duration {
            self.offset = self.duration;
            self.started_at = None;
            self.cancel_timer();
        }
    }

    fn halt(&mut self) {
        self.offset = self.position();
        self.started_at = None;
        self.cancel_timer();
    }

    #[track_caller]
    fn run_from(&mut self, offset: Duration) -> CoreResult<()> {
        let handle = Handle::try_current().map_err(|e| RecorderError::DeviceError {
            reason: format!("Virtual player needs a Tokio runtime: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.cancel_timer();
        self.offset = offset;
        self.started_at = Some(Instant::now());

        let remaining = self.duration.saturating_sub(offset);
        let completion = self.completion.clone();
        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep(remaining).await;
            if let Some(completion) = completion {
                completion();
            }
        }));

        Ok(())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl PlaybackDevice for VirtualPlaybackDevice {
    fn start(&mut self) -> CoreResult<()> {
        self.settle();
        if self.started_at.is_some() {
            return Ok(());
        }

        let offset = if self.offset >= self.duration {
            Duration::ZERO
        } else {
            self.offset
        };
        self.run_from(offset)
    }

    fn pause(&mut self) -> CoreResult<()> {
        self.halt();
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        self.halt();
        self.offset = Duration::ZERO;
        Ok(())
    }

    fn release(&mut self) {
        self.halt();
        self.completion = None;
    }

    fn seek_to(&mut self, position: Duration) -> CoreResult<()> {
        self.settle();
        let target = position.min(self.duration);

        if self.started_at.is_some() {
            self.run_from(target)
        } else {
            self.offset = target;
            Ok(())
        }
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some() && self.position() < self.duration
    }

    fn current_position(&self) -> Duration {
        self.position()
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn on_completion(&mut self, callback: CompletionCallback) {
        self.completion = Some(Arc::from(callback));
    }
}

impl Drop for VirtualPlaybackDevice {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
