mod monitor;
mod session;
mod state;

pub use {
    session::RecordingSession,
    state::{RecordingPhase, RecordingState},
};
