use crate::{
    CoreResult, PlaybackBackend, PlaybackDevice, PlaybackState, RecorderError, SessionOptions,
    playback::progress::{spawn_completion_watcher, spawn_progress},
};

use std::{
    panic::Location,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};

/// Device slot shared between the session and its background tasks.
///
/// `epoch` identifies the progress loop allowed to publish; `load_id`
/// identifies the loaded device, so completions from a replaced device are
/// ignored.
pub(crate) struct PlayerSlot {
    pub(crate) device: Option<Box<dyn PlaybackDevice>>,
    pub(crate) epoch: u64,
    pub(crate) load_id: u64,
}

pub(crate) fn lock_slot(slot: &Mutex<PlayerSlot>) -> MutexGuard<'_, PlayerSlot> {
    slot.lock().unwrap_or_else(|e| {
        error!("Player slot lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

/// Single-file playback state machine.
///
/// Like [`crate::RecordingSession`], commands come from one control task
/// inside a Tokio runtime and invalid commands are silent no-ops.
pub struct PlaybackSession {
    backend: Arc<dyn PlaybackBackend>,
    progress_interval: Duration,
    slot: Arc<Mutex<PlayerSlot>>,
    state_tx: Arc<watch::Sender<PlaybackState>>,
    progress: Option<JoinHandle<()>>,
    completion: Option<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Create a session with nothing loaded.
    pub fn new(backend: Arc<dyn PlaybackBackend>, options: &SessionOptions) -> Self {
        let (state_tx, _) = watch::channel(PlaybackState::default());

        Self {
            backend,
            progress_interval: options.progress_interval,
            slot: Arc::new(Mutex::new(PlayerSlot {
                device: None,
                epoch: 0,
                load_id: 0,
            })),
            state_tx: Arc::new(state_tx),
            progress: None,
            completion: None,
        }
    }

    /// Stream of state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> PlaybackState {
        self.state_tx.borrow().clone()
    }

    /// Play `path`, or pause/resume it if it is already loaded.
    ///
    /// A file that already played to its end is reloaded and restarted from
    /// zero rather than resumed in place.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::LoadError`] if the file cannot be loaded or
    /// has no media, or the device error if it refuses to start. Playback
    /// state is reset in both cases.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play_or_toggle(&mut self, path: &Path) -> CoreResult<()> {
        let state = self.snapshot();

        if state.is_current(path) && !state.is_finished() {
            return self.toggle_play_pause();
        }

        self.load_and_play(path)
    }

    /// Pause or resume the loaded file. No-op if nothing is loaded.
    ///
    /// # Errors
    ///
    /// Returns the device error if pausing or resuming fails; the state is
    /// left unchanged.
    #[instrument(skip(self))]
    pub fn toggle_play_pause(&mut self) -> CoreResult<()> {
        let mut guard = lock_slot(&self.slot);
        let player = &mut *guard;
        let Some(device) = player.device.as_mut() else {
            debug!("Toggle ignored, nothing loaded");
            return Ok(());
        };

        if device.is_playing() {
            device.pause()?;
            player.epoch += 1;
            let position = device.current_position().min(device.duration());

            self.state_tx.send_modify(|state| {
                state.is_playing = false;
                state.position = position;
            });
            drop(guard);

            self.cancel_progress();
            debug!(position_ms = position.as_millis(), "Playback paused");
        } else {
            device.start()?;
            player.epoch += 1;
            let epoch = player.epoch;

            self.state_tx.send_modify(|state| state.is_playing = true);
            drop(guard);

            self.restart_progress(epoch);
            debug!("Playback resumed");
        }

        Ok(())
    }

    /// Move the play head of the loaded file, clamped to its duration.
    ///
    /// # Errors
    ///
    /// Returns the device error if seeking fails.
    #[instrument(skip(self))]
    pub fn seek(&mut self, position: Duration) -> CoreResult<()> {
        let mut guard = lock_slot(&self.slot);
        let Some(device) = guard.device.as_mut() else {
            debug!("Seek ignored, nothing loaded");
            return Ok(());
        };

        let target = position.min(device.duration());
        device.seek_to(target)?;

        self.state_tx.send_modify(|state| state.position = target);

        Ok(())
    }

    /// Stop playback, release the device, and reset the state.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        self.cancel_tasks();

        let mut guard = lock_slot(&self.slot);
        guard.epoch += 1;
        guard.load_id += 1;
        let had_device = Self::release(&mut guard);
        self.state_tx.send_replace(PlaybackState::default());
        drop(guard);

        if had_device {
            info!("Playback stopped");
        }
    }

    /// Tear the session down on owner disposal.
    pub fn shutdown(&mut self) {
        self.stop();
    }

    #[track_caller]
    fn load_and_play(&mut self, path: &Path) -> CoreResult<()> {
        self.cancel_tasks();

        let mut guard = lock_slot(&self.slot);
        guard.epoch += 1;
        guard.load_id += 1;
        Self::release(&mut guard);

        let (device, duration, done_rx) = match self.open(path) {
            Ok(opened) => opened,
            Err(e) => {
                self.state_tx.send_replace(PlaybackState::default());
                return Err(e);
            }
        };

        guard.device = Some(device);
        let epoch = guard.epoch;
        let load_id = guard.load_id;

        self.state_tx.send_replace(PlaybackState {
            current_file: Some(path.to_path_buf()),
            position: Duration::ZERO,
            duration,
            is_playing: true,
        });
        drop(guard);

        self.completion = Some(spawn_completion_watcher(
            Arc::clone(&self.slot),
            Arc::clone(&self.state_tx),
            load_id,
            done_rx,
        ));
        self.restart_progress(epoch);

        info!(
            path = ?path,
            duration_ms = duration.as_millis(),
            "Playback started"
        );

        Ok(())
    }

    /// Load `path`, hook up completion, and start it from zero.
    #[track_caller]
    fn open(
        &self,
        path: &Path,
    ) -> CoreResult<(Box<dyn PlaybackDevice>, Duration, mpsc::UnboundedReceiver<()>)> {
        let mut device = self.backend.load(path)?;

        let duration = device.duration();
        if duration.is_zero() {
            device.release();
            return Err(RecorderError::LoadError {
                path: path.to_path_buf(),
                reason: "Recording has no media".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (done_tx, done_rx) = mpsc::unbounded_channel();
        device.on_completion(Box::new(move || {
            let _ = done_tx.send(());
        }));

        let started = device.seek_to(Duration::ZERO).and_then(|()| device.start());
        if let Err(e) = started {
            device.release();
            return Err(e);
        }

        Ok((device, duration, done_rx))
    }

    fn release(player: &mut PlayerSlot) -> bool {
        let Some(mut device) = player.device.take() else {
            return false;
        };

        if let Err(e) = device.stop() {
            warn!(error = ?e, "Playback device failed to stop cleanly");
        }
        device.release();

        true
    }

    fn restart_progress(&mut self, epoch: u64) {
        self.cancel_progress();
        self.progress = Some(spawn_progress(
            Arc::clone(&self.slot),
            Arc::clone(&self.state_tx),
            epoch,
            self.progress_interval,
        ));
    }

    fn cancel_progress(&mut self) {
        if let Some(handle) = self.progress.take() {
            handle.abort();
        }
    }

    fn cancel_tasks(&mut self) {
        self.cancel_progress();
        if let Some(handle) = self.completion.take() {
            handle.abort();
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        let mut guard = lock_slot(&self.slot);
        guard.epoch += 1;
        guard.load_id += 1;
        Self::release(&mut guard);
        drop(guard);

        self.cancel_tasks();
    }
}
