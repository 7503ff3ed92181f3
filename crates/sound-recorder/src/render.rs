//! Text rendering of recorder snapshots for the console.

use sound_recorder_core::{
    Amplitude, PlaybackState, RecordingFile, RecordingPhase, RecordingState, RenamePrompt,
    SelectionSet,
};

const METER_WIDTH: usize = 12;

/// Level bar for `amplitude`, `METER_WIDTH` cells wide.
pub(crate) fn meter(amplitude: Amplitude) -> String {
    let filled = (amplitude.fraction() * METER_WIDTH as f32).round() as usize;
    let filled = filled.min(METER_WIDTH);
    format!("[{}{}]", "#".repeat(filled), " ".repeat(METER_WIDTH - filled))
}

/// One-line summary of the recorder.
pub(crate) fn recording_line(state: &RecordingState) -> String {
    match state.phase {
        RecordingPhase::Idle => "Ready to record".to_string(),
        RecordingPhase::Recording => format!(
            "REC    {} {}",
            state.elapsed_label(),
            meter(state.amplitude)
        ),
        RecordingPhase::Paused => format!("PAUSED {}", state.elapsed_label()),
        RecordingPhase::Stopped => match state.suggested_name() {
            Some(name) => format!("Saved \"{name}\". Type `name <text>` to rename or `skip`."),
            None => "Stopped".to_string(),
        },
    }
}

/// One-line summary of the player with percent played, or `None` with
/// nothing loaded.
pub(crate) fn playback_line(state: &PlaybackState) -> Option<String> {
    let file = state.current_file.as_ref()?;
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let marker = if state.is_playing { ">" } else { "||" };
    let percent = (state.progress() * 100.0).round() as u32;

    Some(format!(
        "{marker} {name} {} ({percent}%)",
        state.position_label()
    ))
}

/// Numbered library listing with selection and playback markers.
pub(crate) fn listing(
    files: &[RecordingFile],
    selection: &SelectionSet,
    playback: &PlaybackState,
) -> String {
    if files.is_empty() {
        return "No recordings yet".to_string();
    }

    let selecting = selection.is_in_selection_mode();

    files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let check = match (selecting, selection.is_selected(file.path())) {
                (false, _) => "",
                (true, true) => "[x] ",
                (true, false) => "[ ] ",
            };
            let playing = if playback.is_current(file.path()) {
                " <"
            } else {
                ""
            };
            format!("{:>3}. {check}{}{playing}", i + 1, file.file_name())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt text for an open rename dialog.
pub(crate) fn rename_prompt(prompt: &RenamePrompt) -> String {
    format!(
        "Rename \"{}\": type `rename-to <text>` or `cancel`",
        prompt.suggested_name
    )
}
