//! Sound Recorder Core Library
//!
//! Recording and playback session management for a personal voice
//! recorder: capture state machine with pause-aware elapsed time, live
//! amplitude sampling, persistence of finished recordings into a library
//! directory, single-file playback with progress polling, and multi-file
//! selection for batch delete and rename.
//!
//! Audio encoding and decoding are left to the host. The core drives
//! whatever recorder and player the platform offers through the traits in
//! [`CaptureBackend`] and [`PlaybackBackend`].
//!
//! # Example
//!
//! ```no_run
//! use sound_recorder_core::{
//!     CaptureBackend, PlaybackBackend, RecordingLibrary, SessionCoordinator, SessionOptions,
//! };
//!
//! use std::{sync::Arc, time::Duration};
//!
//! async fn record(capture: Arc<dyn CaptureBackend>, player: Arc<dyn PlaybackBackend>) {
//!     let library = RecordingLibrary::new("/home/me/Music/SoundRecorder");
//!     let options = SessionOptions::new("/tmp/sound-recorder");
//!     let mut coordinator = SessionCoordinator::new(capture, player, library, options);
//!
//!     coordinator.start_recording();
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     coordinator.stop_recording();
//!
//!     let saved = coordinator.recording().borrow().pending_file.clone();
//!     println!("Saved: {:?}", saved.map(|file| file.file_name()));
//! }
//! ```

mod coordinator;
mod device;
mod error;
mod library;
mod options;
mod playback;
mod primitives;
mod recording;
mod selection;

pub use {
    coordinator::{Notice, RenamePrompt, SessionCoordinator},
    device::{CaptureBackend, CaptureDevice, CompletionCallback, PlaybackBackend, PlaybackDevice},
    error::{RecorderError, Result as CoreResult},
    library::{AudioFormat, RecordingFile, RecordingLibrary, sanitize_name},
    options::{DEFAULT_MONITOR_INTERVAL, DEFAULT_PROGRESS_INTERVAL, SessionOptions},
    playback::{PlaybackSession, PlaybackState},
    primitives::{Amplitude, clock_label},
    recording::{RecordingPhase, RecordingSession, RecordingState},
    selection::SelectionSet,
};

#[cfg(test)]
mod tests;
