use crate::{
    AppCommand, AppResult,
    app_command::USAGE,
    config::Config,
    render,
    virtual_device::{VirtualCapture, VirtualPlayer},
};

use sound_recorder_core::{
    Notice, PlaybackState, RecordingFile, RecordingState, RenamePrompt, SelectionSet,
    SessionCoordinator,
};

use std::{path::PathBuf, sync::Arc};

use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc, watch,
};
use tracing::{debug, info, instrument, warn};

/// Main application state.
///
/// Owns the session coordinator and renders its snapshot streams to stdout.
/// Commands arrive from the console reader over `command_rx`.
pub struct App {
    pub(crate) coordinator: SessionCoordinator,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    recording_rx: watch::Receiver<RecordingState>,
    playback_rx: watch::Receiver<PlaybackState>,
    listing_rx: watch::Receiver<Vec<RecordingFile>>,
    selection_rx: watch::Receiver<SelectionSet>,
    rename_rx: watch::Receiver<Option<RenamePrompt>>,
    notice_rx: broadcast::Receiver<Notice>,
    last_recording: RecordingState,
    last_playback: Option<(PathBuf, bool, u64)>,
}

impl App {
    /// Wire virtual devices and the configured library into a coordinator.
    ///
    /// The library is listed once up front so an unusable storage directory
    /// fails startup instead of the first command.
    #[track_caller]
    #[instrument(skip_all)]
    pub(crate) fn new(
        config: &Config,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> AppResult<Self> {
        let library = config.library();
        let existing = library.list()?;

        info!(
            recordings_dir = ?library.root(),
            recordings = existing.len(),
            "Library ready"
        );

        let coordinator = SessionCoordinator::new(
            Arc::new(VirtualCapture::new(config.device.amplitude_ceiling)),
            Arc::new(VirtualPlayer),
            library,
            config.session_options(),
        );

        Ok(Self {
            recording_rx: coordinator.recording(),
            playback_rx: coordinator.playback(),
            listing_rx: coordinator.listing(),
            selection_rx: coordinator.selection(),
            rename_rx: coordinator.rename_prompt(),
            notice_rx: coordinator.notices(),
            coordinator,
            command_rx,
            shutdown_tx,
            last_recording: RecordingState::default(),
            last_playback: None,
        })
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Sound Recorder starting");

        println!("{USAGE}");
        self.coordinator.refresh_library();

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(AppCommand::Quit) => {
                        info!("Shutdown requested");
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                },

                Ok(()) = self.recording_rx.changed() => {
                    let state = self.recording_rx.borrow_and_update().clone();
                    self.show_recording(state);
                }

                Ok(()) = self.playback_rx.changed() => {
                    let state = self.playback_rx.borrow_and_update().clone();
                    self.show_playback(&state);
                }

                Ok(()) = self.listing_rx.changed() => {
                    self.listing_rx.mark_unchanged();
                    self.show_listing();
                }

                Ok(()) = self.selection_rx.changed() => {
                    self.selection_rx.mark_unchanged();
                    self.show_listing();
                }

                Ok(()) = self.rename_rx.changed() => {
                    if let Some(prompt) = self.rename_rx.borrow_and_update().as_ref() {
                        println!("{}", render::rename_prompt(prompt));
                    }
                }

                notice = self.notice_rx.recv() => match notice {
                    Ok(notice) => println!("{notice}"),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Console fell behind, notices dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        self.coordinator.shutdown();
        let _ = self.shutdown_tx.send(true);
        info!("Sound Recorder shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    fn handle_command(&mut self, command: AppCommand) {
        match command {
            AppCommand::Record => self.coordinator.start_recording(),
            AppCommand::Pause => {
                if self.recording_rx.borrow().is_recording() {
                    self.coordinator.pause_recording();
                } else {
                    println!("Not recording");
                }
            }
            AppCommand::Stop => self.coordinator.stop_recording(),
            AppCommand::Name { name } => self.coordinator.confirm_recording_name(&name),
            AppCommand::Skip => self.coordinator.dismiss_recording_name(),
            AppCommand::List => self.coordinator.refresh_library(),
            AppCommand::Play { index } => {
                if let Some(file) = self.file_at(index) {
                    self.coordinator.play_or_toggle(&file);
                }
            }
            AppCommand::Toggle => self.coordinator.toggle_play_pause(),
            AppCommand::Seek { position } => self.coordinator.seek(position),
            AppCommand::Halt => self.coordinator.stop_playback(),
            AppCommand::Select { index } => {
                if let Some(file) = self.file_at(index) {
                    self.coordinator.toggle_selection(&file, None);
                }
            }
            AppCommand::Clear => self.coordinator.clear_selection(),
            AppCommand::Delete => self.coordinator.delete_selected(),
            AppCommand::Rename => {
                self.coordinator.request_rename();
                if self.rename_rx.borrow().is_none() {
                    println!("Select exactly one recording to rename");
                }
            }
            AppCommand::RenameTo { name } => self.coordinator.confirm_rename(&name),
            AppCommand::Cancel => self.coordinator.dismiss_rename(),
            AppCommand::Reset => self.coordinator.reset_all(),
            AppCommand::Help => println!("{USAGE}"),
            AppCommand::Quit => {}
        }
    }

    /// Path of the 1-based `index` in the current listing.
    fn file_at(&self, index: usize) -> Option<PathBuf> {
        let file = index
            .checked_sub(1)
            .and_then(|i| self.listing_rx.borrow().get(i).map(|f| f.path().to_path_buf()));

        if file.is_none() {
            debug!(index, "No recording at list position");
            println!("No recording #{index}. Type `list` to see them.");
        }

        file
    }

    /// Print the recorder line when anything but the level changed.
    fn show_recording(&mut self, state: RecordingState) {
        let unchanged = state.phase == self.last_recording.phase
            && state.elapsed == self.last_recording.elapsed
            && state.pending_file == self.last_recording.pending_file;

        if !unchanged {
            println!("{}", render::recording_line(&state));
        }
        self.last_recording = state;
    }

    /// Print the player line once per whole second of play head movement.
    fn show_playback(&mut self, state: &PlaybackState) {
        let key = state
            .current_file
            .clone()
            .map(|file| (file, state.is_playing, state.position.as_secs()));

        if key == self.last_playback {
            return;
        }

        match render::playback_line(state) {
            Some(line) => println!("{line}"),
            None => println!("Playback stopped"),
        }
        self.last_playback = key;
    }

    fn show_listing(&self) {
        let listing = self.listing_rx.borrow().clone();
        let selection = self.selection_rx.borrow().clone();
        let playback = self.playback_rx.borrow().clone();

        println!("{}", render::listing(&listing, &selection, &playback));
    }
}
