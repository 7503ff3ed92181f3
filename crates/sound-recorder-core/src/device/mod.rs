//! Capability interfaces for the platform audio devices.
//!
//! The core never encodes or decodes audio. It drives whatever recorder and
//! player the host provides through these traits, and each session owns at
//! most one device at a time.

mod capture;
mod playback;

pub use {
    capture::{CaptureBackend, CaptureDevice},
    playback::{CompletionCallback, PlaybackBackend, PlaybackDevice},
};
