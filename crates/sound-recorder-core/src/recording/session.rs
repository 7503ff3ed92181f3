use crate::{
    CaptureBackend, CaptureDevice, CoreResult, RecorderError, RecordingFile, RecordingLibrary,
    RecordingPhase, RecordingState, SessionOptions, library::naming,
    recording::monitor::spawn_monitor,
};

use std::{
    fs,
    panic::Location,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::Utc;
use error_location::ErrorLocation;
use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Device slot shared between the session and its monitor loop.
///
/// `epoch` advances on every command that changes which loop may publish;
/// a loop holding an older epoch must not touch the device or the state.
pub(crate) struct CaptureSlot {
    pub(crate) device: Option<Box<dyn CaptureDevice>>,
    pub(crate) epoch: u64,
    pub(crate) segment_start: Option<Instant>,
    pub(crate) accumulated: Duration,
    session_id: Option<Uuid>,
}

pub(crate) fn lock_slot(slot: &Mutex<CaptureSlot>) -> MutexGuard<'_, CaptureSlot> {
    // The slot stays consistent even if a holder panicked mid-tick.
    slot.lock().unwrap_or_else(|e| {
        error!("Capture slot lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

/// Microphone capture state machine.
///
/// Commands are expected from a single control task and must run inside a
/// Tokio runtime, since `start` spawns the monitor loop. Commands issued in
/// a phase that does not support them leave the state untouched and return
/// `Ok(())`.
///
/// # Phases
///
/// ```text
/// Idle/Stopped --start--> Recording --pause--> Paused
///      ^                      |                  |
///      +-------- stop --------+------------------+
/// ```
///
/// `start` while Paused abandons the paused capture and begins a new one.
pub struct RecordingSession {
    backend: Arc<dyn CaptureBackend>,
    library: RecordingLibrary,
    options: SessionOptions,
    slot: Arc<Mutex<CaptureSlot>>,
    state_tx: Arc<watch::Sender<RecordingState>>,
    monitor: Option<JoinHandle<()>>,
    temp_file: Option<PathBuf>,
    unsaved: Vec<PathBuf>,
}

impl RecordingSession {
    /// Create an idle session. Finished captures are saved into `library`.
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        library: RecordingLibrary,
        options: SessionOptions,
    ) -> Self {
        let (state_tx, _) = watch::channel(RecordingState::default());

        Self {
            backend,
            library,
            options,
            slot: Arc::new(Mutex::new(CaptureSlot {
                device: None,
                epoch: 0,
                segment_start: None,
                accumulated: Duration::ZERO,
                session_id: None,
            })),
            state_tx: Arc::new(state_tx),
            monitor: None,
            temp_file: None,
            unsaved: Vec::new(),
        }
    }

    /// Stream of state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<RecordingState> {
        self.state_tx.subscribe()
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> RecordingState {
        self.state_tx.borrow().clone()
    }

    /// Begin a new capture into a fresh temporary file.
    ///
    /// A device still held from an earlier capture is stopped and released
    /// first; failures while doing so are logged and ignored. Captures whose
    /// save failed earlier are moved into the library once the new capture
    /// is running, and stay queued for `stop` if that fails again.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DeviceUnavailable`] if no capture device can
    /// be acquired or started. A previously held device is gone by then, so
    /// the session falls back to Idle.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        self.cancel_monitor();

        let mut slot = lock_slot(&self.slot);
        slot.epoch += 1;

        let had_device = Self::teardown(&mut slot);
        if let Some(abandoned) = self.temp_file.take() {
            warn!(temp = ?abandoned, "Abandoning unfinished capture");
        }

        let (device, temp) = match self.acquire() {
            Ok(acquired) => acquired,
            Err(e) => {
                if had_device {
                    self.state_tx.send_replace(RecordingState::default());
                }
                return Err(e);
            }
        };

        let session_id = Uuid::new_v4();
        slot.device = Some(device);
        slot.segment_start = Some(Instant::now());
        slot.accumulated = Duration::ZERO;
        slot.session_id = Some(session_id);
        let epoch = slot.epoch;

        self.state_tx.send_modify(|state| *state = state.started());
        drop(slot);

        self.temp_file = Some(temp);
        self.monitor = Some(spawn_monitor(
            Arc::clone(&self.slot),
            Arc::clone(&self.state_tx),
            epoch,
            self.options.monitor_interval,
        ));

        info!(session_id = %session_id, "Recording started");

        self.rescue_unsaved();

        Ok(())
    }

    /// Suspend the capture and freeze elapsed time.
    ///
    /// No-op unless currently recording.
    ///
    /// # Errors
    ///
    /// Returns the device error if the device refuses to pause; the session
    /// keeps recording in that case.
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        if self.state_tx.borrow().phase != RecordingPhase::Recording {
            debug!("Pause ignored, not recording");
            return Ok(());
        }

        let mut slot = lock_slot(&self.slot);
        let Some(device) = slot.device.as_mut() else {
            debug!("Pause ignored, no device held");
            return Ok(());
        };

        device.pause()?;

        slot.epoch += 1;
        let now = Instant::now();
        if let Some(segment_start) = slot.segment_start.take() {
            slot.accumulated += now.saturating_duration_since(segment_start);
        }
        let elapsed = slot.accumulated;
        let session_id = slot.session_id;

        self.state_tx.send_modify(|state| *state = state.paused(elapsed));
        drop(slot);

        self.cancel_monitor();

        info!(
            session_id = ?session_id,
            elapsed_ms = elapsed.as_millis(),
            "Recording paused"
        );

        Ok(())
    }

    /// Finalize the capture and save it into the library.
    ///
    /// On success the session is Stopped with `pending_file` set. Calling
    /// `stop` outside a capture retries saves that failed earlier; with
    /// nothing to retry it is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::PersistenceFailure`] if the capture cannot be
    /// moved into the library. The device is released regardless and the
    /// temporary file is kept for a retry.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<()> {
        let phase = self.state_tx.borrow().phase;
        match phase {
            RecordingPhase::Recording | RecordingPhase::Paused => {}
            _ if !self.unsaved.is_empty() => return self.retry_save(),
            _ => {
                debug!("Stop ignored, nothing to stop");
                return Ok(());
            }
        }

        let mut slot = lock_slot(&self.slot);
        slot.epoch += 1;
        let elapsed = match slot.segment_start {
            Some(segment_start) => slot.accumulated + segment_start.elapsed(),
            None => slot.accumulated,
        };
        let session_id = slot.session_id;
        Self::finish(&mut slot);
        drop(slot);

        self.cancel_monitor();

        info!(
            session_id = ?session_id,
            elapsed_ms = elapsed.as_millis(),
            "Recording stopped"
        );

        match self.temp_file.take() {
            Some(temp) => self.save(temp),
            None => {
                self.state_tx.send_modify(|state| *state = state.stopped(None));
                Ok(())
            }
        }
    }

    /// Name the pending recording.
    ///
    /// The name is sanitized and the recording keeps its extension. Returns
    /// the renamed file, or `None` if no prompt was open.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NameCollision`] or
    /// [`RecorderError::InvalidName`] with the prompt still open, or
    /// [`RecorderError::PersistenceFailure`] if the rename fails.
    #[instrument(skip(self))]
    pub fn confirm_rename(&mut self, new_name: &str) -> CoreResult<Option<RecordingFile>> {
        let Some(pending) = self.state_tx.borrow().pending_file.clone() else {
            debug!("Rename ignored, no recording pending");
            return Ok(None);
        };

        let renamed = self.library.rename(pending.path(), new_name)?;

        self.state_tx.send_modify(|state| *state = state.cleared_file());

        info!(name = renamed.name(), "Recording named");

        Ok(Some(renamed))
    }

    /// Close the naming prompt, keeping the generated name.
    pub fn dismiss_rename(&mut self) {
        if self.state_tx.borrow().pending_file.is_some() {
            self.state_tx.send_modify(|state| *state = state.cleared_file());
        }
    }

    /// Tear the session down without saving.
    ///
    /// Cancels the monitor loop and releases any held device. The temporary
    /// file of an unfinished capture stays on disk.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        let mut slot = lock_slot(&self.slot);
        slot.epoch += 1;
        let had_device = Self::teardown(&mut slot);
        drop(slot);

        self.cancel_monitor();

        if had_device {
            self.state_tx.send_replace(RecordingState::default());
            info!("Recording session shut down with capture in progress");
        }
    }

    #[track_caller]
    fn acquire(&self) -> CoreResult<(Box<dyn CaptureDevice>, PathBuf)> {
        fs::create_dir_all(&self.options.temp_dir).map_err(|e| {
            RecorderError::DeviceUnavailable {
                reason: format!(
                    "Cannot create capture directory {:?}: {}",
                    self.options.temp_dir, e
                ),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let temp = naming::temp_capture_path(&self.options.temp_dir, Utc::now());
        let mut device = self.backend.acquire(&temp)?;

        if let Err(e) = device.start() {
            device.release();
            return Err(RecorderError::DeviceUnavailable {
                reason: format!("Capture device refused to start: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(temp = ?temp, "Capture device acquired");

        Ok((device, temp))
    }

    #[track_caller]
    fn save(&mut self, temp: PathBuf) -> CoreResult<()> {
        match self.library.persist(&temp) {
            Ok(file) => {
                self.state_tx
                    .send_modify(|state| *state = state.stopped(Some(file)));
                Ok(())
            }
            Err(e) => {
                error!(temp = ?temp, error = ?e, "Failed to save recording, keeping temp file");
                self.unsaved.push(temp);
                self.state_tx
                    .send_modify(|state| *state = state.stopped(state.pending_file.clone()));
                Err(e)
            }
        }
    }

    #[track_caller]
    fn retry_save(&mut self) -> CoreResult<()> {
        let mut result = Ok(());
        for temp in std::mem::take(&mut self.unsaved) {
            info!(temp = ?temp, "Retrying save");
            if let Err(e) = self.save(temp) {
                result = Err(e);
            }
        }
        result
    }

    /// Best-effort save of earlier failures while a new capture runs.
    ///
    /// The snapshot is left alone; whatever still fails stays queued.
    fn rescue_unsaved(&mut self) {
        for temp in std::mem::take(&mut self.unsaved) {
            match self.library.persist(&temp) {
                Ok(file) => info!(name = file.name(), "Saved earlier capture"),
                Err(e) => {
                    warn!(temp = ?temp, error = ?e, "Earlier capture still unsaved");
                    self.unsaved.push(temp);
                }
            }
        }
    }

    /// Stop and release whatever device the slot holds, swallowing errors.
    fn teardown(slot: &mut CaptureSlot) -> bool {
        let Some(mut device) = slot.device.take() else {
            return false;
        };

        if let Err(e) = device.stop() {
            debug!(error = ?e, "Ignoring stop failure on forced teardown");
        }
        device.release();

        slot.segment_start = None;
        slot.accumulated = Duration::ZERO;
        slot.session_id = None;

        true
    }

    /// Orderly stop and release at the end of a capture.
    fn finish(slot: &mut CaptureSlot) {
        if let Some(mut device) = slot.device.take() {
            if let Err(e) = device.stop() {
                warn!(error = ?e, "Capture device failed to stop cleanly");
            }
            device.release();
        }

        slot.segment_start = None;
        slot.accumulated = Duration::ZERO;
        slot.session_id = None;
    }

    fn cancel_monitor(&mut self) {
        if let Some(handle) = self.monitor.take() {
            handle.abort();
        }
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        let mut slot = lock_slot(&self.slot);
        slot.epoch += 1;
        Self::teardown(&mut slot);
        drop(slot);

        self.cancel_monitor();
    }
}
