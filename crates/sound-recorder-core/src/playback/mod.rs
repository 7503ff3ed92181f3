mod progress;
mod session;
mod state;

pub use {session::PlaybackSession, state::PlaybackState};
