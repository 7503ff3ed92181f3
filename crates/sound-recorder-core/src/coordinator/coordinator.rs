use crate::{
    CaptureBackend, Notice, PlaybackBackend, PlaybackSession, PlaybackState, RecorderError,
    RecordingFile, RecordingLibrary, RecordingSession, RecordingState, RenamePrompt,
    SelectionSet, SessionOptions,
};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

const NOTICE_CAPACITY: usize = 32;

/// Composition root of the recorder.
///
/// Owns both sessions, the library listing, the selection, and the rename
/// prompt, and keeps recording, playback, and selection mutually exclusive
/// at the presentation boundary: entering recording or selection mode stops
/// playback, and playback is refused while a capture is held.
///
/// Command failures never propagate to the caller. They are logged and
/// published as [`Notice::Failed`] (or a more specific notice) on the
/// stream returned by [`SessionCoordinator::notices`].
pub struct SessionCoordinator {
    recording: RecordingSession,
    playback: PlaybackSession,
    library: RecordingLibrary,
    selection_tx: watch::Sender<SelectionSet>,
    listing_tx: watch::Sender<Vec<RecordingFile>>,
    rename_tx: watch::Sender<Option<RenamePrompt>>,
    notice_tx: broadcast::Sender<Notice>,
}

impl SessionCoordinator {
    /// Wire the sessions to the given device backends and library.
    pub fn new(
        capture: Arc<dyn CaptureBackend>,
        player: Arc<dyn PlaybackBackend>,
        library: RecordingLibrary,
        options: SessionOptions,
    ) -> Self {
        let playback = PlaybackSession::new(player, &options);
        let recording = RecordingSession::new(capture, library.clone(), options);

        let (selection_tx, _) = watch::channel(SelectionSet::default());
        let (listing_tx, _) = watch::channel(Vec::new());
        let (rename_tx, _) = watch::channel(None);
        let (notice_tx, _) = broadcast::channel(NOTICE_CAPACITY);

        Self {
            recording,
            playback,
            library,
            selection_tx,
            listing_tx,
            rename_tx,
            notice_tx,
        }
    }

    /// Recording snapshots.
    pub fn recording(&self) -> watch::Receiver<RecordingState> {
        self.recording.subscribe()
    }

    /// Playback snapshots.
    pub fn playback(&self) -> watch::Receiver<PlaybackState> {
        self.playback.subscribe()
    }

    /// Selection snapshots.
    pub fn selection(&self) -> watch::Receiver<SelectionSet> {
        self.selection_tx.subscribe()
    }

    /// Library listing, refreshed after every command that changes storage.
    pub fn listing(&self) -> watch::Receiver<Vec<RecordingFile>> {
        self.listing_tx.subscribe()
    }

    /// Rename dialog for library files.
    pub fn rename_prompt(&self) -> watch::Receiver<Option<RenamePrompt>> {
        self.rename_tx.subscribe()
    }

    /// One-shot user notifications.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    /// Storage directory of the library.
    pub fn library_root(&self) -> &Path {
        self.library.root()
    }

    /// Begin a new capture. Stops playback and leaves selection mode.
    #[instrument(skip(self))]
    pub fn start_recording(&mut self) {
        self.playback.stop();
        self.leave_selection();
        self.rename_tx.send_replace(None);

        match self.recording.start() {
            // Starting may have saved captures left over from a failed stop.
            Ok(()) => self.sync_library(),
            Err(e) => self.fail("Failed to start recording", e),
        }
    }

    /// Pause the running capture.
    #[instrument(skip(self))]
    pub fn pause_recording(&mut self) {
        if let Err(e) = self.recording.pause() {
            self.fail("Failed to pause recording", e);
        }
    }

    /// Finish the capture and save it into the library.
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) {
        let before = self.recording.snapshot().pending_file;
        let result = self.recording.stop();
        self.refresh_library();

        match result {
            Ok(()) => {
                let after = self.recording.snapshot().pending_file;
                if let Some(file) = after.filter(|file| before.as_ref() != Some(file)) {
                    self.notify(Notice::Saved {
                        file_name: file.file_name(),
                    });
                }
            }
            Err(e) => self.fail("Failed to save recording", e),
        }
    }

    /// Name the just-saved capture. The prompt stays open on collision.
    #[instrument(skip(self))]
    pub fn confirm_recording_name(&mut self, new_name: &str) {
        match self.recording.confirm_rename(new_name) {
            Ok(Some(file)) => {
                self.refresh_library();
                self.notify(Notice::Renamed {
                    file_name: file.file_name(),
                });
            }
            Ok(None) => {}
            Err(e) => self.rename_failed(e),
        }
    }

    /// Keep the generated name for the just-saved capture.
    pub fn dismiss_recording_name(&mut self) {
        self.recording.dismiss_rename();
    }

    /// Re-scan the storage directory.
    #[instrument(skip(self))]
    pub fn refresh_library(&mut self) {
        match self.library.list() {
            Ok(files) => {
                self.listing_tx.send_replace(files);
            }
            Err(e) => self.fail("Failed to list recordings", e),
        }
    }

    /// Rescan, publishing only if the listing changed.
    fn sync_library(&mut self) {
        match self.library.list() {
            Ok(files) => {
                self.listing_tx.send_if_modified(|listing| {
                    if *listing == files {
                        return false;
                    }
                    *listing = files;
                    true
                });
            }
            Err(e) => self.fail("Failed to list recordings", e),
        }
    }

    /// Play `path`, or pause/resume it if already loaded.
    ///
    /// Ignored while a capture is recording or paused. Leaves selection
    /// mode.
    #[instrument(skip(self))]
    pub fn play_or_toggle(&mut self, path: &Path) {
        if self.recording.snapshot().is_active() {
            debug!("Playback ignored while a capture is in progress");
            return;
        }

        self.leave_selection();

        if let Err(e) = self.playback.play_or_toggle(path) {
            self.fail("Playback failed", e);
        }
    }

    /// Pause or resume the loaded file.
    #[instrument(skip(self))]
    pub fn toggle_play_pause(&mut self) {
        if let Err(e) = self.playback.toggle_play_pause() {
            self.fail("Playback failed", e);
        }
    }

    /// Move the play head of the loaded file.
    #[instrument(skip(self))]
    pub fn seek(&mut self, position: Duration) {
        if let Err(e) = self.playback.seek(position) {
            self.fail("Seek failed", e);
        }
    }

    /// Stop playback and unload the file.
    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    /// Mark or unmark `path`; `checked = None` flips it.
    ///
    /// Entering selection mode stops playback.
    #[instrument(skip(self))]
    pub fn toggle_selection(&mut self, path: &Path, checked: Option<bool>) {
        let current = self.selection_tx.borrow().clone();
        let next = match checked {
            Some(selected) => current.set_selected(path, selected),
            None => current.toggle(path),
        };

        if next.is_in_selection_mode() && !current.is_in_selection_mode() {
            self.playback.stop();
        }

        self.selection_tx.send_replace(next);
    }

    /// Leave selection mode.
    pub fn clear_selection(&mut self) {
        self.leave_selection();
    }

    /// Delete every selected recording and leave selection mode.
    #[instrument(skip(self))]
    pub fn delete_selected(&mut self) {
        let selected: Vec<PathBuf> = self
            .selection_tx
            .borrow()
            .iter()
            .map(Path::to_path_buf)
            .collect();
        if selected.is_empty() {
            debug!("Delete ignored, nothing selected");
            return;
        }

        let playing = self.playback.snapshot().current_file;
        if playing.is_some_and(|file| selected.contains(&file)) {
            self.playback.stop();
        }

        let count = self.library.delete(selected.iter().map(PathBuf::as_path));
        if count < selected.len() {
            warn!(
                requested = selected.len(),
                removed = count,
                "Some recordings could not be deleted"
            );
        }

        self.selection_tx.send_replace(SelectionSet::default());
        self.refresh_library();
        self.notify(Notice::Deleted { count });
    }

    /// Open the rename dialog for the single selected recording.
    pub fn request_rename(&mut self) {
        let Some(file) = self.selection_tx.borrow().single().map(Path::to_path_buf) else {
            debug!("Rename requires exactly one selected recording");
            return;
        };

        self.rename_tx.send_replace(Some(RenamePrompt::for_file(file)));
    }

    /// Rename the file in the open dialog.
    ///
    /// On success the listing is refreshed and both the dialog and the
    /// selection are cleared. On collision nothing changes.
    #[instrument(skip(self))]
    pub fn confirm_rename(&mut self, new_name: &str) {
        let Some(prompt) = self.rename_tx.borrow().clone() else {
            debug!("Rename ignored, no dialog open");
            return;
        };

        match self.library.rename(&prompt.file, new_name) {
            Ok(file) => {
                self.rename_tx.send_replace(None);
                self.selection_tx.send_replace(SelectionSet::default());
                self.refresh_library();
                self.notify(Notice::Renamed {
                    file_name: file.file_name(),
                });
            }
            Err(e) => self.rename_failed(e),
        }
    }

    /// Close the rename dialog.
    pub fn dismiss_rename(&mut self) {
        self.rename_tx.send_replace(None);
    }

    /// Return the list screen to its initial state.
    #[instrument(skip(self))]
    pub fn reset_all(&mut self) {
        self.playback.stop();
        self.selection_tx.send_replace(SelectionSet::default());
        self.rename_tx.send_replace(None);
    }

    /// Release both devices. The coordinator stays usable afterwards.
    #[instrument(skip(self))]
    pub fn shutdown(&mut self) {
        self.playback.shutdown();
        self.recording.shutdown();
        info!("Session coordinator shut down");
    }

    fn leave_selection(&mut self) {
        if self.selection_tx.borrow().is_in_selection_mode() {
            self.selection_tx.send_replace(SelectionSet::default());
        }
    }

    fn rename_failed(&self, e: RecorderError) {
        match e {
            RecorderError::NameCollision { path, .. } => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(file_name = %file_name, "Rename rejected, name taken");
                self.notify(Notice::RenameRejected { file_name });
            }
            other => self.fail("Rename failed", other),
        }
    }

    fn fail(&self, context: &str, e: RecorderError) {
        warn!(error = ?e, "{}", context);
        self.notify(Notice::Failed {
            message: format!("{context}: {e}"),
        });
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine; notices are fire-and-forget.
        let _ = self.notice_tx.send(notice);
    }
}
