mod audio_format;
#[allow(clippy::module_inception)]
mod library;
pub(crate) mod naming;
mod recording_file;

pub use {
    audio_format::AudioFormat, library::RecordingLibrary, naming::sanitize_name,
    recording_file::RecordingFile,
};
